//! # DTR Repository
//!
//! Aggregates over the distribution-transformer hierarchy (DTR → feeder →
//! consumer meter): instantaneous load and energy totals from the latest
//! reading per meter, daily consumption series, and the paginated DTR
//! overview table.

use sea_orm::{EntityTrait, FromQueryResult, Statement, Value};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::Db;
use crate::error::RepositoryError;
use crate::models::Dtr;
use crate::models::dtr::Model as DtrModel;
use crate::repositories::{ph, ph_list};

pub const MAX_PAGE_SIZE: u64 = 100;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Aggregatable telemetry quantities, each pinned to the table and column it
/// lives in. Keeping this a closed enum is what lets the aggregate SQL be
/// assembled with `format!`: only these identifiers ever reach the query
/// text; everything request-supplied is bound as a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryMetric {
    /// Cumulative active energy (kWh), from the energy registers.
    EnergyKwh,
    /// Cumulative apparent energy (kVAh), from the energy registers.
    EnergyKvah,
    /// Instantaneous active power (kW).
    ActivePowerKw,
    /// Instantaneous apparent power (kVA).
    ApparentPowerKva,
    /// Instantaneous neutral current (A).
    NeutralCurrent,
}

impl TelemetryMetric {
    fn table(self) -> &'static str {
        match self {
            Self::EnergyKwh | Self::EnergyKvah => "d3_b3",
            Self::ActivePowerKw | Self::ApparentPowerKva | Self::NeutralCurrent => "d2",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::EnergyKwh => "kwh",
            Self::EnergyKvah => "kvah",
            Self::ActivePowerKw => "kw",
            Self::ApparentPowerKva => "kva",
            Self::NeutralCurrent => "neutral_current",
        }
    }
}

/// One day of summed consumption across a DTR's meters.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct DailyConsumption {
    /// Calendar day, `YYYY-MM-DD`
    pub day: String,
    pub total_kwh: f64,
}

/// One row of the DTR overview table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DtrTableRow {
    /// 1-based position within the full (filtered) result, page-independent
    pub row_num: u64,
    pub dtr_id: i32,
    pub dtr_name: String,
    pub capacity_kva: Option<f64>,
    pub feeder_count: i64,
    pub meter_count: i64,
}

/// A page of the DTR overview plus the figures needed for page metadata.
#[derive(Debug, Clone)]
pub struct DtrTablePage {
    pub rows: Vec<DtrTableRow>,
    pub total_count: u64,
    pub page: u64,
    pub limit: u64,
}

#[derive(Debug, FromQueryResult)]
struct MeterRow {
    meter_serial: String,
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: f64,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

#[derive(Debug, FromQueryResult)]
struct DtrOverviewRow {
    dtr_id: i32,
    dtr_name: String,
    capacity_kva: Option<f64>,
    feeder_count: i64,
    meter_count: i64,
}

/// Repository for DTR-level aggregates.
pub struct DtrRepository<'a> {
    db: &'a Db,
}

impl<'a> DtrRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Fetch a DTR by id, or `NotFound`.
    pub async fn get_dtr(&self, dtr_id: i32) -> Result<DtrModel, RepositoryError> {
        self.db
            .timed(Dtr::find_by_id(dtr_id).one(self.db.conn()))
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("DTR {dtr_id}")))
    }

    /// Serials of every meter hanging off the DTR's feeders.
    pub async fn meters_for_dtr(&self, dtr_id: i32) -> Result<Vec<String>, RepositoryError> {
        let b = self.db.backend();
        let sql = format!(
            "SELECT c.meter_serial AS meter_serial \
             FROM consumers_lkea c \
             JOIN feeder_master f ON f.feeder_id = c.feeder_id \
             WHERE f.dtr_id = {}",
            ph(b, 1)
        );
        let stmt = Statement::from_sql_and_values(b, sql, [dtr_id.into()]);

        let rows = self
            .db
            .timed(MeterRow::find_by_statement(stmt).all(self.db.conn()))
            .await?;

        Ok(rows.into_iter().map(|r| r.meter_serial).collect())
    }

    /// Sum a metric over the latest reading of each meter, considering only
    /// readings at or after `window_start`. Meters silent for the whole
    /// window contribute nothing; an empty meter set short-circuits to zero.
    pub async fn latest_reading_total(
        &self,
        metric: TelemetryMetric,
        meters: &[String],
        window_start: &str,
    ) -> Result<f64, RepositoryError> {
        if meters.is_empty() {
            return Ok(0.0);
        }

        let b = self.db.backend();
        let table = metric.table();
        let column = metric.column();
        let sql = format!(
            "SELECT COALESCE(SUM(t.{column}), 0.0) AS total \
             FROM {table} t \
             JOIN ( \
                 SELECT meter_serial, MAX(ts) AS max_ts \
                 FROM {table} \
                 WHERE ts >= {} AND meter_serial IN ({}) \
                 GROUP BY meter_serial \
             ) latest ON latest.meter_serial = t.meter_serial AND latest.max_ts = t.ts",
            ph(b, 1),
            ph_list(b, 2, meters.len())
        );

        let mut values: Vec<Value> = Vec::with_capacity(meters.len() + 1);
        values.push(window_start.into());
        values.extend(meters.iter().map(|m| Value::from(m.as_str())));
        let stmt = Statement::from_sql_and_values(b, sql, values);

        let row = self
            .db
            .timed(TotalRow::find_by_statement(stmt).one(self.db.conn()))
            .await?;

        Ok(row.map(|r| r.total).unwrap_or(0.0))
    }

    /// Per-day kWh sums across the DTR's meters since `window_start`,
    /// ascending by day. Rows with a blank meter serial are junk from the
    /// loaders and are skipped, as are consumers flagged disconnected.
    pub async fn daily_consumption(
        &self,
        meters: &[String],
        window_start: &str,
    ) -> Result<Vec<DailyConsumption>, RepositoryError> {
        if meters.is_empty() {
            return Ok(Vec::new());
        }

        let b = self.db.backend();
        let sql = format!(
            "SELECT substr(c.ts, 1, 10) AS day, SUM(c.kwh) AS total_kwh \
             FROM consumption_lkea c \
             WHERE c.ts >= {} \
               AND c.meter_serial IN ({}) \
               AND TRIM(c.meter_serial) <> '' \
               AND c.uid NOT IN (SELECT uid FROM disconnected_consumers_lkea) \
             GROUP BY substr(c.ts, 1, 10) \
             ORDER BY day",
            ph(b, 1),
            ph_list(b, 2, meters.len())
        );

        let mut values: Vec<Value> = Vec::with_capacity(meters.len() + 1);
        values.push(window_start.into());
        values.extend(meters.iter().map(|m| Value::from(m.as_str())));
        let stmt = Statement::from_sql_and_values(b, sql, values);

        self.db
            .timed(DailyConsumption::find_by_statement(stmt).all(self.db.conn()))
            .await
    }

    /// One page of the DTR overview, optionally filtered by a name search.
    /// `page` is 1-based and clamped up to 1; `limit` is clamped into
    /// `1..=MAX_PAGE_SIZE`. The total count is taken with the same filter so
    /// page metadata stays consistent with the rows.
    pub async fn dtr_table(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<DtrTablePage, RepositoryError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        // Saturate so an absurd page number yields an empty page, not an
        // overflow or a negative OFFSET after the i64 cast below.
        let offset = page
            .saturating_sub(1)
            .saturating_mul(limit)
            .min(i64::MAX as u64);
        let pattern = match search {
            Some(s) if !s.trim().is_empty() => format!("%{}%", s.trim()),
            _ => "%".to_string(),
        };

        let b = self.db.backend();
        let count_sql = format!(
            "SELECT COUNT(*) AS total FROM dtr_master WHERE dtr_name LIKE {}",
            ph(b, 1)
        );
        let count_stmt =
            Statement::from_sql_and_values(b, count_sql, [pattern.as_str().into()]);
        let total_count = self
            .db
            .timed(CountRow::find_by_statement(count_stmt).one(self.db.conn()))
            .await?
            .map(|r| r.total.max(0) as u64)
            .unwrap_or(0);

        let rows_sql = format!(
            "SELECT d.dtr_id AS dtr_id, d.dtr_name AS dtr_name, d.capacity_kva AS capacity_kva, \
                 (SELECT COUNT(*) FROM feeder_master f \
                  WHERE f.dtr_id = d.dtr_id) AS feeder_count, \
                 (SELECT COUNT(*) FROM consumers_lkea c \
                  JOIN feeder_master f2 ON c.feeder_id = f2.feeder_id \
                  WHERE f2.dtr_id = d.dtr_id) AS meter_count \
             FROM dtr_master d \
             WHERE d.dtr_name LIKE {} \
             ORDER BY d.dtr_id \
             LIMIT {} OFFSET {}",
            ph(b, 1),
            ph(b, 2),
            ph(b, 3)
        );
        let rows_stmt = Statement::from_sql_and_values(
            b,
            rows_sql,
            [
                pattern.as_str().into(),
                (limit as i64).into(),
                (offset as i64).into(),
            ],
        );
        let raw_rows = self
            .db
            .timed(DtrOverviewRow::find_by_statement(rows_stmt).all(self.db.conn()))
            .await?;

        let rows = raw_rows
            .into_iter()
            .enumerate()
            .map(|(i, r)| DtrTableRow {
                row_num: offset + i as u64 + 1,
                dtr_id: r.dtr_id,
                dtr_name: r.dtr_name,
                capacity_kva: r.capacity_kva,
                feeder_count: r.feeder_count,
                meter_count: r.meter_count,
            })
            .collect();

        Ok(DtrTablePage {
            rows,
            total_count,
            page,
            limit,
        })
    }
}
