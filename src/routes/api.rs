use axum::{Json, extract::State};
use axum_extra::extract::Query;

use super::AppState;
use crate::dashboard::{self, Dashboard, DashboardQuery, DashboardRequest};
use crate::error::AppError;

/// GET /api/meal - The assembled dashboard as JSON.
///
/// Unlike the page, any input problem is an error rather than a notice.
#[tracing::instrument(skip_all)]
pub async fn meal(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let config = &state.config.dashboard;
    let request = DashboardRequest::from_query(query, config, dashboard::today(config));

    if !request.notices.is_empty() {
        return Err(AppError::InvalidQuery(request.notices));
    }

    Ok(Json(dashboard::load(state.meals.as_ref(), &request).await))
}
