use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::db::MetricRepository;
use crate::dto::{
    DeleteResponse, MetricFieldsRequest, MetricListResponse, MetricRangeQuery,
    MetricSavedResponse, NarrativeResponse, UpsertMetricRequest,
};
use crate::error::AppResult;
use crate::models::metric::MetricEntry;
use crate::services::{export, metrics, narrative, summary};
use crate::AppState;

const EXPORT_FILENAME: &str = "wellness-data.csv";

pub async fn upsert_metric(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<UpsertMetricRequest>,
) -> AppResult<Json<MetricSavedResponse>> {
    body.validate()?;
    let day = metrics::normalize_day(&body.date)?;

    let store = MetricRepository::new(&state.db);
    let metric = metrics::upsert(&store, auth_user.id, day, &body.fields.into_patch()).await?;

    Ok(Json(MetricSavedResponse {
        message: "Metric saved successfully".into(),
        metric,
    }))
}

pub async fn list_metrics(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MetricRangeQuery>,
) -> AppResult<Json<MetricListResponse>> {
    let store = MetricRepository::new(&state.db);
    let metrics = metrics::list(&store, auth_user.id, query.range()?).await?;

    Ok(Json(MetricListResponse {
        count: metrics.len(),
        metrics,
    }))
}

pub async fn get_metric(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MetricEntry>> {
    let store = MetricRepository::new(&state.db);
    Ok(Json(metrics::get(&store, auth_user.id, id).await?))
}

pub async fn update_metric(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<MetricFieldsRequest>,
) -> AppResult<Json<MetricSavedResponse>> {
    body.validate()?;

    let store = MetricRepository::new(&state.db);
    let metric = metrics::update(&store, auth_user.id, id, &body.into_patch()).await?;

    Ok(Json(MetricSavedResponse {
        message: "Metric updated successfully".into(),
        metric,
    }))
}

pub async fn delete_metric(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteResponse>> {
    let store = MetricRepository::new(&state.db);
    metrics::delete(&store, auth_user.id, id).await?;

    Ok(Json(DeleteResponse { deleted: true, id }))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MetricRangeQuery>,
) -> AppResult<Json<summary::SummaryStats>> {
    let store = MetricRepository::new(&state.db);
    Ok(Json(summary::summarize(&store, auth_user.id, query.range()?).await?))
}

pub async fn get_mood_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MetricRangeQuery>,
) -> AppResult<Json<NarrativeResponse>> {
    let store = MetricRepository::new(&state.db);
    let summary = narrative::narrate(&store, auth_user.id, query.range()?).await?;
    Ok(Json(NarrativeResponse { summary }))
}

pub async fn export_csv(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MetricRangeQuery>,
) -> AppResult<impl IntoResponse> {
    let store = MetricRepository::new(&state.db);
    let rows = export::to_table(&store, auth_user.id, query.range()?).await?;

    tracing::debug!(user_id = %auth_user.id, rows = rows.len(), "Exporting metrics as CSV");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        export::render_csv(&rows),
    ))
}
