use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    errors::ServiceError,
    services::analytics::{AnalyticsReport, AnalyticsService, Period},
    tenant::TenantScope,
    ApiResponse, AppState,
};

/// Build the analytics Router scoped under `/api/v1/analytics`
pub fn analytics_routes() -> Router<AppState> {
    Router::new().route("/report", get(get_report))
}

/// Query parameters for the report endpoint
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Rolling window: week, month or year (default: month)
    pub period: Option<Period>,
}

#[utoipa::path(
    get,
    path = "/api/v1/analytics/report",
    params(ReportQuery),
    responses(
        (status = 200, description = "Business report for the caller's salon", body = ApiResponse<AnalyticsReport>),
        (status = 401, description = "No valid session", body = crate::errors::ErrorResponse),
        (status = 503, description = "Analytics data unavailable", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn get_report(
    State(state): State<AppState>,
    scope: TenantScope,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<AnalyticsReport>>, ServiceError> {
    let service = AnalyticsService::new(state.db.clone(), state.insights.clone());
    let period = query.period.unwrap_or_default();
    let report = service.compute_report(&scope, period).await?;
    Ok(Json(ApiResponse::success(report)))
}
