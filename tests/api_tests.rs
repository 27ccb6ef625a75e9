//! End-to-end tests for the HTTP surface: routes are exercised through the
//! full router (extractors, handlers, repositories) against an in-memory
//! SQLite database with migrations applied.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Database, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

use gridportal::config::AppConfig;
use gridportal::db::Db;
use gridportal::migration::{Migrator, MigratorTrait};
use gridportal::models::{bill, consumer, dtr, energy_telemetry, feeder, location, tariff};
use gridportal::server::{AppState, create_app};

const UID_HEADER: &str = "x-consumer-uid";

async fn test_app() -> (Router, Db) {
    let conn = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    let db = Db::new(conn, 10_000);

    let config = AppConfig {
        profile: "test".to_string(),
        ..Default::default()
    };
    let state = AppState {
        db: db.clone(),
        config: Arc::new(config),
    };

    (create_app(state), db)
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, uid: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(UID_HEADER, uid)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

async fn seed_consumer(db: &Db, uid: &str, meter: &str, block: Option<&str>) {
    consumer::ActiveModel {
        uid: Set(uid.to_string()),
        consumer_name: Set("Asha Rao".to_string()),
        meter_serial: Set(meter.to_string()),
        block_name: Set(block.map(str::to_string)),
        address: Set(Some("12 Canal Road".to_string())),
        phone: Set(None),
        connection_type: Set(Some("domestic".to_string())),
        feeder_id: Set(None),
        profile_image: Set(None),
    }
    .insert(db.conn())
    .await
    .unwrap();
}

#[tokio::test]
async fn root_reports_service_info() {
    let (app, _db) = test_app().await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "gridportal");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn health_probes_the_database() {
    let (app, _db) = test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "success");
}

#[tokio::test]
async fn consumer_routes_require_identity_header() {
    let (app, _db) = test_app().await;

    let response = app.oneshot(get("/consumer/details")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn unknown_consumer_is_a_clean_404() {
    let (app, _db) = test_app().await;

    let response = app
        .oneshot(get_as("/consumer/details", "C-404"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error_id"].is_string());
}

#[tokio::test]
async fn consumer_details_merge_profile_hierarchy_and_last_comm() {
    let (app, db) = test_app().await;
    seed_consumer(&db, "C-1", "M-1", Some("Block A")).await;
    location::ActiveModel {
        location_id: Set(20),
        location_name: Set("Substation 7".to_string()),
        location_type: Set("substation".to_string()),
        parent_location_id: Set(None),
    }
    .insert(db.conn())
    .await
    .unwrap();
    location::ActiveModel {
        location_id: Set(10),
        location_name: Set("Block A".to_string()),
        location_type: Set("block".to_string()),
        parent_location_id: Set(Some(20)),
    }
    .insert(db.conn())
    .await
    .unwrap();

    let response = app
        .oneshot(get_as("/consumer/details", "C-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["uid"], "C-1");
    assert_eq!(body["data"]["meter_serial"], "M-1");
    assert_eq!(body["data"]["level1_name"], "Block A");
    assert_eq!(body["data"]["level2_name"], "Substation 7");
    // no telemetry seeded, so last_comm is explicit null rather than an error
    assert!(body["data"]["last_comm"].is_null());
}

#[tokio::test]
async fn consumer_power_reports_zero_due_without_bills() {
    let (app, db) = test_app().await;
    seed_consumer(&db, "C-1", "M-1", None).await;

    let response = app.oneshot(get_as("/consumer/power", "C-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["due"], 0.0);
    assert!(body["data"]["last_comm"].is_null());
}

#[tokio::test]
async fn consumer_power_sums_due_across_bills() {
    let (app, db) = test_app().await;
    seed_consumer(&db, "C-1", "M-1", None).await;
    for (date, due) in [("2026-06-01", 150.0), ("2026-07-01", 50.5)] {
        bill::ActiveModel {
            id: NotSet,
            uid: Set("C-1".to_string()),
            bill_date: Set(date.to_string()),
            bill_amount: Set(1000.0),
            due_amount: Set(due),
            due_date: Set(None),
            status: Set("unpaid".to_string()),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    let response = app.oneshot(get_as("/consumer/power", "C-1")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["due"], 200.5);
}

#[tokio::test]
async fn consumer_billing_returns_status_only() {
    let (app, db) = test_app().await;
    seed_consumer(&db, "C-1", "M-1", None).await;

    let response = app
        .oneshot(get_as("/consumer/billing", "C-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!({"status": "success"}));
}

#[tokio::test]
async fn tariff_table_is_returned_in_full() {
    let (app, db) = test_app().await;
    for (category, start) in [("domestic", 0.0), ("commercial", 100.0)] {
        tariff::ActiveModel {
            id: NotSet,
            consumer_category: Set(category.to_string()),
            slab_start_kwh: Set(start),
            slab_end_kwh: Set(Some(start + 100.0)),
            rate_per_kwh: Set(4.5),
            fixed_charge: Set(50.0),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    let response = app
        .oneshot(get_as("/consumer/tariff", "C-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn ticket_lifecycle_over_http() {
    let (app, _db) = test_app().await;
    let payload = json!({
        "ticket_id": "TKT-1",
        "subject": "Power outage in Block A",
        "category": "outage",
        "status": "open",
        "priority": "high",
        "consumer_uid": "C-1",
    });

    // create
    let response = app
        .clone()
        .oneshot(json_request("POST", "/tickets", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["ticket_id"], "TKT-1");
    let first_stamp = created["last_updated"].as_str().unwrap().to_string();

    // read returns identical fields
    let response = app.clone().oneshot(get("/tickets/TKT-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);

    // duplicate id is a conflict, not a 500
    let response = app
        .clone()
        .oneshot(json_request("POST", "/tickets", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    // status update reflects new value and a strictly later stamp
    let response = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/tickets/TKT-1",
            &json!({"status": "resolved"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "resolved");
    assert!(updated["last_updated"].as_str().unwrap() > first_stamp.as_str());

    // delete, then the ticket is gone
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/tickets/TKT-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_json(response).await["message"]
            .as_str()
            .unwrap()
            .contains("TKT-1")
    );

    let response = app.oneshot(get("/tickets/TKT-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_ticket_fields_fail_validation_before_insert() {
    let (app, _db) = test_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/tickets",
            &json!({"ticket_id": "TKT-1", "subject": "   ", "status": "open"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(body["details"]["field"], "subject");

    // nothing was stored
    let response = app.oneshot(get("/tickets")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn dtr_table_meta_is_internally_consistent() {
    let (app, db) = test_app().await;
    for id in 1..=7 {
        dtr::ActiveModel {
            dtr_id: Set(id),
            dtr_name: Set(format!("DTR {id:02}")),
            capacity_kva: Set(Some(63.0)),
            location_id: Set(None),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    let response = app
        .oneshot(get("/dtr/table?page=2&limit=3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let meta = &body["meta"];
    assert_eq!(meta["current_page"], 2);
    assert_eq!(meta["total_count"], 7);
    assert_eq!(meta["total_pages"], 3);
    assert_eq!(meta["has_next_page"], true);
    assert_eq!(meta["has_prev_page"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"][0]["row_num"], 4);
}

#[tokio::test]
async fn dtr_load_uses_only_the_newest_reading_per_meter() {
    let (app, db) = test_app().await;
    dtr::ActiveModel {
        dtr_id: Set(1),
        dtr_name: Set("DTR North".to_string()),
        capacity_kva: Set(Some(100.0)),
        location_id: Set(None),
    }
    .insert(db.conn())
    .await
    .unwrap();
    feeder::ActiveModel {
        feeder_id: Set(11),
        dtr_id: Set(1),
        feeder_name: Set("F-11".to_string()),
    }
    .insert(db.conn())
    .await
    .unwrap();
    consumer::ActiveModel {
        uid: Set("C-1".to_string()),
        consumer_name: Set("Asha Rao".to_string()),
        meter_serial: Set("M-1".to_string()),
        block_name: Set(None),
        address: Set(None),
        phone: Set(None),
        connection_type: Set(None),
        feeder_id: Set(Some(11)),
        profile_image: Set(None),
    }
    .insert(db.conn())
    .await
    .unwrap();

    // an older and a newer reading inside the trailing day
    let now = chrono::Utc::now();
    let older = (now - chrono::Duration::hours(3))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let newer = (now - chrono::Duration::hours(1))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    for (ts, kwh) in [(older, 100.0), (newer, 140.0)] {
        energy_telemetry::ActiveModel {
            id: NotSet,
            meter_serial: Set("M-1".to_string()),
            ts: Set(ts),
            kwh: Set(Some(kwh)),
            kvah: Set(Some(kwh + 5.0)),
        }
        .insert(db.conn())
        .await
        .unwrap();
    }

    let response = app.oneshot(get("/dtr/1/load")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["kwh"], 140.0);
    assert_eq!(body["data"]["kvah"], 145.0);
    assert_eq!(body["data"]["meter_count"], 1);
}

#[tokio::test]
async fn dtr_routes_report_unknown_ids() {
    let (app, _db) = test_app().await;

    let response = app.clone().oneshot(get("/dtr/99/load")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/dtr/99/consumption/daily"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_error_reports_deduplicate() {
    let (app, _db) = test_app().await;
    let payload = json!({
        "level": "error",
        "source": "dashboard/billing",
        "message": "TypeError: x is undefined",
        "user_agent": "Mozilla/5.0",
    });

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/log/error", &payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["success"], true);
    }

    let response = app.oneshot(get("/log/logs")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["occurrences"], 3);
}

#[tokio::test]
async fn blank_log_fields_are_rejected() {
    let (app, _db) = test_app().await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/log/error",
            &json!({"level": "", "source": "dashboard", "message": "boom"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn profile_image_path_round_trips() {
    let (app, db) = test_app().await;
    seed_consumer(&db, "C-1", "M-1", None).await;

    let request = Request::builder()
        .method("POST")
        .uri("/profile/edit/image")
        .header(UID_HEADER, "C-1")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({"image_path": "uploads/c-1.png"})).unwrap(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "success");

    let response = app
        .oneshot(get_as("/consumer/details", "C-1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["profile_image"], "uploads/c-1.png");
}

#[tokio::test]
async fn error_responses_carry_a_trace_correlated_id() {
    let (app, _db) = test_app().await;

    let request = Request::builder()
        .uri("/tickets/TKT-404")
        .header("x-trace-id", "trace-e2e-1")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers().get("x-trace-id").unwrap(), "trace-e2e-1");

    let body = body_json(response).await;
    assert_eq!(body["error_id"], "trace-e2e-1");
}
