// src/services/insight_service.rs

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        format::{format_percent, format_rupiah},
    },
    models::dashboard::DashboardMetrics,
};

// What the AI function receives. Amounts are sent raw and pre-formatted so
// the prompt on the other side can quote them as-is.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummaryPayload {
    pub period: String,
    pub revenue: Decimal,
    pub gross_margin: Decimal,
    pub expenses: Decimal,
    pub losses: Decimal,
    pub net_profit: Decimal,
    pub margin_percentage: Decimal,
    pub transaction_count: u32,
    pub revenue_growth: Decimal,
    pub net_profit_growth: Decimal,
    pub top_products: Vec<String>,
    pub highlights: Vec<String>,
}

impl FinancialSummaryPayload {
    pub fn from_metrics(metrics: &DashboardMetrics) -> Self {
        let current = &metrics.current;

        Self {
            period: metrics.period.label_id(),
            revenue: current.revenue,
            gross_margin: current.gross_margin,
            expenses: current.expenses,
            losses: current.losses,
            net_profit: current.net_profit,
            margin_percentage: metrics.margin_percentage,
            transaction_count: current.transaction_count,
            revenue_growth: metrics.growth.revenue,
            net_profit_growth: metrics.growth.net_profit,
            top_products: metrics
                .top_products
                .iter()
                .map(|p| format!("{} ({} transaksi, {})", p.product_type, p.count, format_rupiah(p.revenue)))
                .collect(),
            highlights: vec![
                format!("Pendapatan {} ({})", format_rupiah(current.revenue), format_percent(metrics.growth.revenue)),
                format!("Laba bersih {} ({})", format_rupiah(current.net_profit), format_percent(metrics.growth.net_profit)),
                format!("Pengeluaran {} ({})", format_rupiah(current.expenses), format_percent(metrics.growth.expenses)),
            ],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommentaryResponse {
    pub commentary: String,
}

#[async_trait]
pub trait CommentaryProvider: Send + Sync {
    async fn commentary(&self, payload: &FinancialSummaryPayload) -> Result<String, AppError>;
}

pub struct HttpCommentaryProvider {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpCommentaryProvider {
    pub fn new(url: String, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, url, api_key })
    }
}

#[async_trait]
impl CommentaryProvider for HttpCommentaryProvider {
    async fn commentary(&self, payload: &FinancialSummaryPayload) -> Result<String, AppError> {
        let mut request = self.client.post(&self.url).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::AiUpstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::AiUpstream(format!("status {}", status)));
        }

        let body: CommentaryResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiUpstream(format!("invalid body: {}", e)))?;

        let text = body.commentary.trim();
        if text.is_empty() {
            return Err(AppError::AiUpstream("empty commentary".to_string()));
        }
        Ok(text.to_string())
    }
}

/// Asks the configured provider for commentary. `None` means the feature is
/// switched off for this deployment.
pub async fn generate_commentary(
    provider: Option<&dyn CommentaryProvider>,
    metrics: &DashboardMetrics,
) -> Result<String, AppError> {
    let provider = provider.ok_or(AppError::AiNotConfigured)?;
    let payload = FinancialSummaryPayload::from_metrics(metrics);
    provider.commentary(&payload).await
}
