use axum::{
	Json, Router,
	extract::{Path, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post, put},
};
use serde::Serialize;

use crate::state::AppState;
use famrank_domain::UserProfile;
use famrank_service::{
	Error, LookupRequest, LookupResponse, ReindexReport, ReindexUserResponse, SearchRequest,
	SearchResponse, SuggestRequest, SuggestResponse,
};

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/users/search", post(search))
		.route("/v1/users/lookup", post(lookup))
		.route("/v1/users/suggest", post(suggest))
		.route("/v1/users/{uid}", get(get_user))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new()
		.route("/v1/admin/users/reindex", post(reindex_all))
		.route("/v1/admin/users/{uid}", put(update_user))
		.route("/v1/admin/users/{uid}/reindex", post(reindex_user))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(payload): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn lookup(
	State(state): State<AppState>,
	Json(payload): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
	let response = state.service.search_users(payload).await?;

	Ok(Json(response))
}

async fn suggest(
	State(state): State<AppState>,
	Json(payload): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
	let response = state.service.suggest_users(payload).await?;

	Ok(Json(response))
}

async fn get_user(
	State(state): State<AppState>,
	Path(uid): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
	let Some(profile) = state.service.get_user_profile(&uid).await? else {
		return Err(json_error(
			StatusCode::NOT_FOUND,
			"not_found",
			format!("User {uid:?} does not exist."),
			None,
		));
	};

	Ok(Json(profile))
}

async fn update_user(
	State(state): State<AppState>,
	Path(uid): Path<String>,
	Json(payload): Json<UserProfile>,
) -> Result<Json<UserProfile>, ApiError> {
	if payload.uid.trim() != uid.trim() {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			"Body uid must match the path.",
			Some(vec!["$.uid".to_string()]),
		));
	}

	let profile = state.service.update_user_profile(payload).await?;

	Ok(Json(profile))
}

async fn reindex_user(
	State(state): State<AppState>,
	Path(uid): Path<String>,
) -> Result<Json<ReindexUserResponse>, ApiError> {
	let response = state.service.update_user_for_search(&uid).await?;

	Ok(Json(response))
}

async fn reindex_all(State(state): State<AppState>) -> Result<Json<ReindexReport>, ApiError> {
	let response = state.service.update_all_users_for_search().await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::QueryTooShort { .. } => json_error(
				StatusCode::BAD_REQUEST,
				"query_too_short",
				err.to_string(),
				Some(vec!["$.query".to_string()]),
			),
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "not_found", message, None),
			Error::Provider { message } => {
				tracing::error!(error = %message, "Search index request failed.");

				json_error(StatusCode::BAD_GATEWAY, "provider_error", message, None)
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Datastore request failed.");

				json_error(StatusCode::SERVICE_UNAVAILABLE, "storage_error", message, None)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}
