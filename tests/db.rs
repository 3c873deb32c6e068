// Tests against a real Postgres. `sqlx::test` creates a fresh database per
// test from DATABASE_URL and applies ./migrations.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool, Postgres,
};
use tower::ServiceExt;
use uuid::Uuid;

use dashboard_backend::{
    build_router,
    common::error::AppError,
    config::{AppState, Config},
    db::SalesRepository,
    models::auth::Claims,
    services::{
        insight_service::{CommentaryProvider, FinancialSummaryPayload},
        sales_service::SalesService,
    },
};

const SECRET: &str = "test-secret";

const HEADER: &str = "transaction_date,customer_name,product_type,purchase_price,selling_price,marketplace_fee,payment_method,description";

fn upload() -> String {
    format!(
        "{HEADER}\n\
2024-05-01,Ani,aksesoris,10000,25000,0,tunai,\n\
2024-05-02,Budi,handphone,1000000,99999999999999999,0,qris,\n\
2024-05-03,Citra,tablet,2000000,2300000,15000,debit,Promo\n\
2024-05-04,Dewi,laptop,5000000,5600000,0.001,transfer,\n"
    )
}

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        jwt_secret: SECRET.into(),
        bind_addr: "127.0.0.1:0".into(),
        db_max_connections: 1,
        storage_dir: std::env::temp_dir().join(format!("db-test-{}", Uuid::new_v4())),
        public_base_url: "http://localhost:3000".into(),
        font_dir: PathBuf::from("./fonts"),
        ai_function_url: None,
        ai_function_key: None,
    }
}

fn app(pool: PgPool) -> Router {
    build_router(AppState::from_parts(pool, &test_config(), None))
}

fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now().timestamp() + 3600) as usize,
        email: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).expect("token")
}

async fn connection_for(pool: &PgPool, user_id: Uuid) -> PoolConnection<Postgres> {
    let mut conn = pool.acquire().await.expect("connection");
    sqlx::query("SELECT set_config('app.user_id', $1, false)")
        .bind(user_id.to_string())
        .execute(&mut *conn)
        .await
        .expect("set app.user_id");
    conn
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[sqlx::test(migrations = "./migrations")]
async fn import_inserts_exactly_the_valid_rows_in_file_order(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let service = SalesService::new(SalesRepository::new());
    let mut conn = connection_for(&pool, user_id).await;

    let outcome = service.import_csv(&mut *conn, user_id, &upload()).await.unwrap();

    assert_eq!(outcome.inserted, 2);
    assert_eq!(outcome.skipped, 2);
    assert_eq!(outcome.rejected.iter().map(|r| r.line).collect::<Vec<_>>(), vec![3, 5]);

    let names: Vec<_> = outcome.sales.iter().map(|s| s.customer_name.as_str()).collect();
    assert_eq!(names, vec!["Ani", "Citra"]);
    assert!(outcome.sales.iter().all(|s| s.user_id == user_id));
    assert_eq!(outcome.sales[1].gross_margin, Decimal::from(285_000));

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    assert_eq!(stored, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn malformed_upload_inserts_nothing(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let service = SalesService::new(SalesRepository::new());
    let mut conn = connection_for(&pool, user_id).await;

    assert!(service.import_csv(&mut *conn, user_id, "customer_name\nAni\n").await.is_err());

    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    assert_eq!(stored, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn imported_sales_show_up_in_the_dashboard(pool: PgPool) {
    let user_id = Uuid::new_v4();
    let bearer = format!("Bearer {}", token_for(user_id));
    let app = app(pool);

    let response = app
        .clone()
        .oneshot(
            Request::post("/api/sales/import")
                .header(header::AUTHORIZATION, &bearer)
                .header(header::CONTENT_TYPE, "text/csv")
                .body(Body::from(upload()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["inserted"], 2);
    assert_eq!(body["skipped"], 2);

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/dashboard/summary?month=2024-05")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["current"]["transactionCount"], 2);
    assert_eq!(body["current"]["revenue"].as_f64(), Some(2_325_000.0));
    assert_eq!(body["current"]["grossMargin"].as_f64(), Some(300_000.0));
    assert_eq!(body["previous"]["transactionCount"], 0);

    let response = app
        .oneshot(
            Request::get("/api/dashboard/daily?month=2024-05")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let days = body.as_array().unwrap();
    assert_eq!(days.len(), 31);
    assert_eq!(days[0]["day"], NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().to_string());
    assert_eq!(days[0]["revenue"].as_f64(), Some(25_000.0));
    assert_eq!(days[1]["revenue"].as_f64(), Some(0.0));
}

#[sqlx::test(migrations = "./migrations")]
async fn other_users_do_not_see_imported_sales(pool: PgPool) {
    let owner = Uuid::new_v4();
    let service = SalesService::new(SalesRepository::new());
    let mut conn = connection_for(&pool, owner).await;
    service.import_csv(&mut *conn, owner, &upload()).await.unwrap();
    drop(conn);

    let response = app(pool)
        .oneshot(
            Request::get("/api/sales?month=2024-05")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for(Uuid::new_v4())))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, Value::Array(vec![]));
}

// Needs a pooled connection of its own while it "thinks".
struct PoolBoundProvider {
    pool: PgPool,
}

#[async_trait]
impl CommentaryProvider for PoolBoundProvider {
    async fn commentary(&self, _payload: &FinancialSummaryPayload) -> Result<String, AppError> {
        self.pool
            .acquire()
            .await
            .map_err(|e| AppError::AiUpstream(e.to_string()))?;
        Ok("Penjualan stabil.".to_string())
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn insight_releases_its_connection_before_the_ai_call(
    pool_options: PgPoolOptions,
    connect_options: PgConnectOptions,
) {
    let pool = pool_options
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .connect_with(connect_options)
        .await
        .unwrap();

    let provider = Arc::new(PoolBoundProvider { pool: pool.clone() }) as Arc<dyn CommentaryProvider>;
    let app = build_router(AppState::from_parts(pool, &test_config(), Some(provider)));

    let response = app
        .oneshot(
            Request::post("/api/insights?month=2024-05")
                .header(header::AUTHORIZATION, format!("Bearer {}", token_for(Uuid::new_v4())))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["commentary"], "Penjualan stabil.");
}
