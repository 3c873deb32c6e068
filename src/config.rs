// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{AssetRepository, AttendanceRepository, DashboardRepository, ExpenseRepository, LossRepository, SalesRepository},
    services::{
        attendance_service::AttendanceService,
        auth::TokenVerifier,
        dashboard_service::DashboardService,
        insight_service::{CommentaryProvider, HttpCommentaryProvider},
        report_service::ReportService,
        sales_service::SalesService,
        storage_service::PhotoStorage,
    },
};

// Settings read from the environment (and an optional .env file).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub storage_dir: PathBuf,
    pub public_base_url: String,
    pub font_dir: PathBuf,
    pub ai_function_url: Option<String>,
    pub ai_function_key: Option<String>,
}

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{} must be set", name))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let db_max_connections = match optional("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {}", raw))?,
            None => 5,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: optional("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections,
            storage_dir: PathBuf::from(optional("STORAGE_DIR").unwrap_or_else(|| "./storage".to_string())),
            public_base_url: optional("PUBLIC_BASE_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            font_dir: PathBuf::from(optional("FONT_DIR").unwrap_or_else(|| "./fonts".to_string())),
            ai_function_url: optional("AI_FUNCTION_URL"),
            ai_function_key: optional("AI_FUNCTION_KEY"),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub token_verifier: TokenVerifier,
    pub sales_service: SalesService,
    pub expense_repo: ExpenseRepository,
    pub loss_repo: LossRepository,
    pub asset_repo: AssetRepository,
    pub attendance_service: AttendanceService,
    pub dashboard_service: DashboardService,
    pub report_service: ReportService,
    pub photo_storage: PhotoStorage,
    pub commentary: Option<Arc<dyn CommentaryProvider>>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("failed to connect to the database")?;

        tracing::info!("✅ Database connection established");

        let commentary = match &config.ai_function_url {
            Some(url) => {
                let provider = HttpCommentaryProvider::new(url.clone(), config.ai_function_key.clone())?;
                Some(Arc::new(provider) as Arc<dyn CommentaryProvider>)
            }
            None => {
                tracing::warn!("AI_FUNCTION_URL not set, AI commentary is disabled");
                None
            }
        };

        Ok(Self::from_parts(db_pool, config, commentary))
    }

    // Wires the dependency graph on top of an existing pool. Tests use this
    // with a lazily connected pool.
    pub fn from_parts(
        db_pool: PgPool,
        config: &Config,
        commentary: Option<Arc<dyn CommentaryProvider>>,
    ) -> Self {
        let sales_repo = SalesRepository::new();
        let expense_repo = ExpenseRepository::new();
        let loss_repo = LossRepository::new();
        let asset_repo = AssetRepository::new();
        let attendance_repo = AttendanceRepository::new();
        let dashboard_repo = DashboardRepository::new();

        let dashboard_service = DashboardService::new(
            sales_repo.clone(),
            expense_repo.clone(),
            loss_repo.clone(),
            asset_repo.clone(),
            dashboard_repo,
        );

        Self {
            token_verifier: TokenVerifier::new(&config.jwt_secret),
            sales_service: SalesService::new(sales_repo),
            expense_repo,
            loss_repo,
            asset_repo,
            attendance_service: AttendanceService::new(attendance_repo),
            dashboard_service,
            report_service: ReportService::new(config.font_dir.clone()),
            photo_storage: PhotoStorage::new(config.storage_dir.clone(), config.public_base_url.clone()),
            commentary,
            db_pool,
        }
    }
}
