use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::util::ServiceExt;

use restock_api::{
    app_router,
    config::{AppConfig, ReplenishmentDefaults},
    db::{establish_connection_with_config, run_migrations, DbConfig},
    events::EventSender,
    services::replenishment::ReplenishmentService,
    AppState,
};

async fn test_app() -> Router {
    let db_cfg = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..Default::default()
    };
    let db = establish_connection_with_config(&db_cfg)
        .await
        .expect("failed to open in-memory database");
    run_migrations(&db).await.expect("failed to run migrations");
    let db = Arc::new(db);

    let (tx, mut rx) = mpsc::channel(100);
    // Drain events so sends never block the handlers under test.
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let event_sender = EventSender::new(tx);

    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 8080,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_json: false,
        auto_migrate: false,
        replenishment: ReplenishmentDefaults::default(),
    };

    let replenishment = ReplenishmentService::new(db.clone(), event_sender.clone());
    app_router(AppState {
        db,
        config,
        event_sender,
        replenishment,
    })
}

#[tokio::test]
async fn health_reports_ok_with_reachable_store() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn draft_generation_rejects_negative_policy_values() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/replenishment/drafts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"coverage_days": -1}"#))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn draft_generation_succeeds_on_empty_catalog() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/replenishment/drafts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{}"#))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn unknown_draft_is_not_found() {
    let app = test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/replenishment/drafts/00000000-0000-0000-0000-000000000000")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
