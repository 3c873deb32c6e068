// src/lib.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;
use crate::services::storage_service::MAX_PHOTO_BYTES;

pub fn build_router(app_state: AppState) -> Router {
    let sales_routes = Router::new()
        .route("/"
               ,get(handlers::sales::list_sales)
               .post(handlers::sales::create_sale)
        )
        .route("/{id}"
               ,get(handlers::sales::get_sale)
               .put(handlers::sales::update_sale)
               .delete(handlers::sales::delete_sale)
        )
        .route("/import/preview", post(handlers::sales::preview_import))
        .route("/import", post(handlers::sales::import_sales))
        .route("/export", get(handlers::sales::export_sales));

    let expense_routes = Router::new()
        .route("/"
               ,get(handlers::expenses::list_expenses)
               .post(handlers::expenses::create_expense)
        )
        .route("/{id}"
               ,get(handlers::expenses::get_expense)
               .put(handlers::expenses::update_expense)
               .delete(handlers::expenses::delete_expense)
        );

    let loss_routes = Router::new()
        .route("/"
               ,get(handlers::losses::list_losses)
               .post(handlers::losses::create_loss)
        )
        .route("/{id}"
               ,get(handlers::losses::get_loss)
               .put(handlers::losses::update_loss)
               .delete(handlers::losses::delete_loss)
        );

    let asset_routes = Router::new()
        .route("/"
               ,get(handlers::assets::list_assets)
               .post(handlers::assets::create_asset)
        )
        .route("/{id}"
               ,get(handlers::assets::get_asset)
               .put(handlers::assets::update_asset)
               .delete(handlers::assets::delete_asset)
        );

    let attendance_routes = Router::new()
        .route("/"
               ,get(handlers::attendance::monthly_attendance)
               .post(handlers::attendance::record_attendance)
        )
        .route("/{id}"
               ,put(handlers::attendance::update_attendance)
               .delete(handlers::attendance::delete_attendance)
        );

    let dashboard_routes = Router::new()
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/daily", get(handlers::dashboard::get_daily));

    // Body limit above the photo limit so oversize uploads get our own 413.
    let profile_routes = Router::new()
        .route("/photo"
               ,get(handlers::profile::get_photo)
               .put(handlers::profile::upload_photo)
               .delete(handlers::profile::delete_photo)
        )
        .layer(DefaultBodyLimit::max(MAX_PHOTO_BYTES * 2));

    // Everything under /api except health needs a bearer token.
    let protected = Router::new()
        .nest("/sales", sales_routes)
        .nest("/expenses", expense_routes)
        .nest("/losses", loss_routes)
        .nest("/assets", asset_routes)
        .nest("/attendance", attendance_routes)
        .nest("/dashboard", dashboard_routes)
        .nest("/profile", profile_routes)
        .route("/reports/monthly", get(handlers::reports::monthly_report))
        .route("/insights", post(handlers::insights::create_insight))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", protected)
        .route("/storage/{user_id}/{file}", get(handlers::profile::serve_photo))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state)
}
