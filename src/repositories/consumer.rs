//! # Consumer Repository
//!
//! Read-mostly queries behind the consumer dashboard: profile details with
//! the location hierarchy walk, power-quality snapshots, overdue totals,
//! latest-bill selection, and the tariff reference table. The only write is
//! the profile image path.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, IntoActiveModel, Order,
    QueryFilter, QueryOrder, Set, Statement,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::Db;
use crate::error::RepositoryError;
use crate::models::bill::Model as BillModel;
use crate::models::consumer::Model as ConsumerModel;
use crate::models::power_telemetry::{Column as PowerColumn, Model as PowerModel};
use crate::models::tariff::Model as TariffModel;
use crate::models::{Consumer, PowerTelemetry, Tariff};
use crate::repositories::{current_month_bounds, ph};

/// One row of the flattened location walk: the named node plus up to four
/// ancestors. Levels past the root come back as `None`.
#[derive(Debug, Clone, PartialEq, FromQueryResult, Serialize, ToSchema)]
pub struct LocationChain {
    pub level1_id: i32,
    pub level1_name: String,
    pub level1_type: String,
    pub level2_id: Option<i32>,
    pub level2_name: Option<String>,
    pub level2_type: Option<String>,
    pub level3_id: Option<i32>,
    pub level3_name: Option<String>,
    pub level3_type: Option<String>,
    pub level4_id: Option<i32>,
    pub level4_name: Option<String>,
    pub level4_type: Option<String>,
    pub level5_id: Option<i32>,
    pub level5_name: Option<String>,
    pub level5_type: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct OverdueRow {
    total_due: f64,
}

/// Repository for consumer-facing dashboard queries.
pub struct ConsumerRepository<'a> {
    db: &'a Db,
}

impl<'a> ConsumerRepository<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db }
    }

    /// Fetch a consumer by uid, or `NotFound`.
    pub async fn get_consumer(&self, uid: &str) -> Result<ConsumerModel, RepositoryError> {
        self.db
            .timed(Consumer::find_by_id(uid.to_owned()).one(self.db.conn()))
            .await?
            .ok_or_else(|| RepositoryError::not_found(format!("consumer {uid}")))
    }

    /// Walk the location hierarchy upward from the node matching
    /// `location_name`, up to five levels. When several nodes share the name,
    /// the lowest `location_id` wins so repeated calls stay deterministic.
    pub async fn location_hierarchy(
        &self,
        location_name: &str,
    ) -> Result<Option<LocationChain>, RepositoryError> {
        let b = self.db.backend();
        let sql = format!(
            "SELECT \
                 l1.location_id AS level1_id, l1.location_name AS level1_name, l1.location_type AS level1_type, \
                 l2.location_id AS level2_id, l2.location_name AS level2_name, l2.location_type AS level2_type, \
                 l3.location_id AS level3_id, l3.location_name AS level3_name, l3.location_type AS level3_type, \
                 l4.location_id AS level4_id, l4.location_name AS level4_name, l4.location_type AS level4_type, \
                 l5.location_id AS level5_id, l5.location_name AS level5_name, l5.location_type AS level5_type \
             FROM location_hierarchy_lkea l1 \
             LEFT JOIN location_hierarchy_lkea l2 ON l2.location_id = l1.parent_location_id \
             LEFT JOIN location_hierarchy_lkea l3 ON l3.location_id = l2.parent_location_id \
             LEFT JOIN location_hierarchy_lkea l4 ON l4.location_id = l3.parent_location_id \
             LEFT JOIN location_hierarchy_lkea l5 ON l5.location_id = l4.parent_location_id \
             WHERE l1.location_name = {} \
             ORDER BY l1.location_id \
             LIMIT 1",
            ph(b, 1)
        );
        let stmt = Statement::from_sql_and_values(b, sql, [location_name.into()]);

        self.db
            .timed(LocationChain::find_by_statement(stmt).one(self.db.conn()))
            .await
    }

    /// Timestamp of the most recent power-quality row for a meter.
    pub async fn last_communication(
        &self,
        meter_serial: &str,
    ) -> Result<Option<String>, RepositoryError> {
        let row = self
            .db
            .timed(
                PowerTelemetry::find()
                    .filter(PowerColumn::MeterSerial.eq(meter_serial))
                    .order_by(PowerColumn::Ts, Order::Desc)
                    .one(self.db.conn()),
            )
            .await?;

        Ok(row.map(|r| r.ts))
    }

    /// Latest instantaneous power-quality row for a meter, if any telemetry
    /// has ever arrived.
    pub async fn power_snapshot(
        &self,
        meter_serial: &str,
    ) -> Result<Option<PowerModel>, RepositoryError> {
        self.db
            .timed(
                PowerTelemetry::find()
                    .filter(PowerColumn::MeterSerial.eq(meter_serial))
                    .order_by(PowerColumn::Ts, Order::Desc)
                    .one(self.db.conn()),
            )
            .await
    }

    /// Sum of `due_amount` across all of the consumer's bills; zero when the
    /// consumer has no bills at all.
    pub async fn overdue_amount(&self, uid: &str) -> Result<f64, RepositoryError> {
        let b = self.db.backend();
        let sql = format!(
            "SELECT COALESCE(SUM(due_amount), 0.0) AS total_due FROM bill_lkea WHERE uid = {}",
            ph(b, 1)
        );
        let stmt = Statement::from_sql_and_values(b, sql, [uid.into()]);

        let row = self
            .db
            .timed(OverdueRow::find_by_statement(stmt).one(self.db.conn()))
            .await?;

        Ok(row.map(|r| r.total_due).unwrap_or(0.0))
    }

    /// The consumer's "latest" bill under two-tier ordering: any bill dated
    /// inside the current calendar month beats bills from other months, then
    /// the most recent `bill_date` wins.
    pub async fn latest_bill(&self, uid: &str) -> Result<Option<BillModel>, RepositoryError> {
        let (month_start, next_month_start) = current_month_bounds();
        let b = self.db.backend();
        let sql = format!(
            "SELECT id, uid, bill_date, bill_amount, due_amount, due_date, status \
             FROM bill_lkea \
             WHERE uid = {} \
             ORDER BY CASE WHEN bill_date >= {} AND bill_date < {} THEN 0 ELSE 1 END, \
                      bill_date DESC \
             LIMIT 1",
            ph(b, 1),
            ph(b, 2),
            ph(b, 3)
        );
        let stmt = Statement::from_sql_and_values(
            b,
            sql,
            [uid.into(), month_start.into(), next_month_start.into()],
        );

        self.db
            .timed(BillModel::find_by_statement(stmt).one(self.db.conn()))
            .await
    }

    /// Full tariff reference table, unfiltered.
    pub async fn tariff_rates(&self) -> Result<Vec<TariffModel>, RepositoryError> {
        self.db.timed(Tariff::find().all(self.db.conn())).await
    }

    /// Record the storage path of a freshly uploaded profile image.
    pub async fn set_profile_image(
        &self,
        uid: &str,
        image_path: String,
    ) -> Result<ConsumerModel, RepositoryError> {
        let consumer = self.get_consumer(uid).await?;

        let mut active = consumer.into_active_model();
        active.profile_image = Set(Some(image_path));

        self.db.timed(active.update(self.db.conn())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{bill, consumer, location, power_telemetry};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveValue::NotSet, Database};

    async fn setup() -> Db {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&conn, None).await.unwrap();
        Db::new(conn, 10_000)
    }

    async fn seed_consumer(db: &Db, uid: &str, meter: &str) {
        consumer::ActiveModel {
            uid: Set(uid.to_string()),
            consumer_name: Set("Asha Rao".to_string()),
            meter_serial: Set(meter.to_string()),
            block_name: Set(Some("Block A".to_string())),
            address: Set(None),
            phone: Set(None),
            connection_type: Set(Some("domestic".to_string())),
            feeder_id: Set(None),
            profile_image: Set(None),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    async fn seed_bill(db: &Db, uid: &str, bill_date: &str, due: f64) {
        bill::ActiveModel {
            id: NotSet,
            uid: Set(uid.to_string()),
            bill_date: Set(bill_date.to_string()),
            bill_amount: Set(1200.0),
            due_amount: Set(due),
            due_date: Set(None),
            status: Set("unpaid".to_string()),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    async fn seed_location(db: &Db, id: i32, name: &str, kind: &str, parent: Option<i32>) {
        location::ActiveModel {
            location_id: Set(id),
            location_name: Set(name.to_string()),
            location_type: Set(kind.to_string()),
            parent_location_id: Set(parent),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    async fn seed_power(db: &Db, meter: &str, ts: &str, kw: f64) {
        power_telemetry::ActiveModel {
            id: NotSet,
            meter_serial: Set(meter.to_string()),
            ts: Set(ts.to_string()),
            voltage_r: Set(Some(230.1)),
            voltage_y: Set(Some(231.4)),
            voltage_b: Set(Some(229.8)),
            current_r: Set(Some(4.1)),
            current_y: Set(Some(4.0)),
            current_b: Set(Some(4.2)),
            neutral_current: Set(Some(0.3)),
            power_factor: Set(Some(0.96)),
            frequency: Set(Some(50.01)),
            kw: Set(Some(kw)),
            kva: Set(Some(kw / 0.96)),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn missing_consumer_is_not_found() {
        let db = setup().await;
        let repo = ConsumerRepository::new(&db);

        let err = repo.get_consumer("C-404").await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn power_snapshot_returns_latest_row() {
        let db = setup().await;
        seed_power(&db, "M-1", "2026-08-20 10:00:00", 3.0).await;
        seed_power(&db, "M-1", "2026-08-21 09:30:00", 4.5).await;
        seed_power(&db, "M-2", "2026-08-22 08:00:00", 9.9).await;

        let repo = ConsumerRepository::new(&db);
        let snapshot = repo.power_snapshot("M-1").await.unwrap().unwrap();
        assert_eq!(snapshot.ts, "2026-08-21 09:30:00");
        assert_eq!(snapshot.kw, Some(4.5));

        let last = repo.last_communication("M-1").await.unwrap();
        assert_eq!(last.as_deref(), Some("2026-08-21 09:30:00"));

        assert!(repo.power_snapshot("M-3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overdue_amount_is_zero_without_bills() {
        let db = setup().await;
        let repo = ConsumerRepository::new(&db);
        assert_eq!(repo.overdue_amount("C-1").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn overdue_amount_sums_all_bills() {
        let db = setup().await;
        seed_bill(&db, "C-1", "2026-06-01", 150.5).await;
        seed_bill(&db, "C-1", "2026-07-01", 200.0).await;
        seed_bill(&db, "C-2", "2026-07-01", 999.0).await;

        let repo = ConsumerRepository::new(&db);
        assert_eq!(repo.overdue_amount("C-1").await.unwrap(), 350.5);
    }

    #[tokio::test]
    async fn current_month_bill_beats_newer_months_absent() {
        let db = setup().await;
        let (month_start, _) = current_month_bounds();
        let in_month = format!("{}{}", &month_start[..8], "05");
        seed_bill(&db, "C-1", &in_month, 10.0).await;
        seed_bill(&db, "C-1", "2020-01-15", 20.0).await;

        let repo = ConsumerRepository::new(&db);
        let bill = repo.latest_bill("C-1").await.unwrap().unwrap();
        assert_eq!(bill.bill_date, in_month);
    }

    #[tokio::test]
    async fn latest_bill_falls_back_to_most_recent() {
        let db = setup().await;
        seed_bill(&db, "C-1", "2020-03-01", 10.0).await;
        seed_bill(&db, "C-1", "2020-01-01", 20.0).await;

        let repo = ConsumerRepository::new(&db);
        let bill = repo.latest_bill("C-1").await.unwrap().unwrap();
        assert_eq!(bill.bill_date, "2020-03-01");

        assert!(repo.latest_bill("C-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn location_walk_stops_at_root() {
        let db = setup().await;
        seed_location(&db, 30, "North Division", "division", None).await;
        seed_location(&db, 20, "Substation 7", "substation", Some(30)).await;
        seed_location(&db, 10, "Block A", "block", Some(20)).await;

        let repo = ConsumerRepository::new(&db);
        let chain = repo.location_hierarchy("Block A").await.unwrap().unwrap();

        assert_eq!(chain.level1_name, "Block A");
        assert_eq!(chain.level2_name.as_deref(), Some("Substation 7"));
        assert_eq!(chain.level3_name.as_deref(), Some("North Division"));
        assert!(chain.level4_id.is_none());
        assert!(chain.level5_id.is_none());

        assert!(repo.location_hierarchy("Nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_location_names_resolve_deterministically() {
        let db = setup().await;
        seed_location(&db, 5, "Block A", "block", None).await;
        seed_location(&db, 3, "Block A", "block", None).await;

        let repo = ConsumerRepository::new(&db);
        let chain = repo.location_hierarchy("Block A").await.unwrap().unwrap();
        assert_eq!(chain.level1_id, 3);
    }

    #[tokio::test]
    async fn profile_image_path_is_persisted() {
        let db = setup().await;
        seed_consumer(&db, "C-1", "M-1").await;

        let repo = ConsumerRepository::new(&db);
        let updated = repo
            .set_profile_image("C-1", "uploads/c-1.png".to_string())
            .await
            .unwrap();
        assert_eq!(updated.profile_image.as_deref(), Some("uploads/c-1.png"));

        let err = repo
            .set_profile_image("C-404", "uploads/x.png".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }
}
