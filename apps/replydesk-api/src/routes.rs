use axum::{
	Extension, Json, Router,
	body::{Body, Bytes},
	extract::{
		Path, Query, State,
		rejection::{JsonRejection, PathRejection, QueryRejection},
	},
	http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION},
	middleware::{self, Next},
	response::{IntoResponse, Response},
	routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{rate_limit, state::AppState};
use replydesk_domain::{lead::LeadStatus, signature};
use replydesk_providers::session::SessionUser;
use replydesk_service::{
	BusinessMetrics, BusinessView, ConnectBusinessRequest, ConversationView, CreateTemplateRequest,
	Error, LeadView, ManualLeadRequest, MessageView, PostMessageRequest, TemplateView,
	UpdateLeadStatusRequest, UpdateTemplateRequest, YelpWebhookRequest,
};

pub const SIGNATURE_HEADER: &str = "x-yelp-signature";

const WEBHOOK_FAILURE: &str = "Failed to process webhook.";

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

	fn internal(message: impl Into<String>) -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message, None)
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			Error::Unauthorized { message } =>
				json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message, None),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			Error::Provider { message } => {
				tracing::error!(error = %message, "Provider request failed.");

				ApiError::internal("Internal error.")
			},
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage request failed.");

				ApiError::internal("Internal error.")
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(err: JsonRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	}
}
impl From<PathRejection> for ApiError {
	fn from(err: PathRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	}
}
impl From<QueryRejection> for ApiError {
	fn from(err: QueryRejection) -> Self {
		json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text(), None)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

#[derive(Debug, Deserialize)]
struct LeadFilter {
	status: Option<LeadStatus>,
}

pub fn router(state: AppState) -> Router {
	let dashboard = Router::new()
		.route("/api/business", get(get_business).put(connect_business))
		.route("/api/leads", get(list_leads).post(create_lead))
		.route("/api/leads/{id}", get(get_lead))
		.route("/api/leads/{id}/status", patch(update_lead_status))
		.route("/api/leads/{id}/reply", post(reply_to_lead))
		.route("/api/conversations", get(list_conversations))
		.route("/api/conversations/{id}", get(get_conversation))
		.route("/api/conversations/{id}/messages", post(post_message))
		.route("/api/templates", get(list_templates).post(create_template))
		.route("/api/templates/{id}", patch(update_template).delete(delete_template))
		.route("/api/metrics", get(metrics))
		.route_layer(middleware::from_fn_with_state(state.clone(), require_session));

	Router::new()
		.route("/health", get(health))
		.route("/api/webhook/yelp", post(yelp_webhook))
		.merge(dashboard)
		.layer(middleware::from_fn_with_state(state.clone(), rate_limit::limit_requests))
		.with_state(state)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// Verifies the platform signature over the raw body before anything is parsed or stored.
///
/// Any failure after the signature check is a generic 500.
async fn yelp_webhook(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<(StatusCode, Json<LeadView>), ApiError> {
	let provided = headers.get(SIGNATURE_HEADER).and_then(|value| value.to_str().ok());

	if let Err(err) = signature::verify(&state.service.cfg.webhook.yelp_secret, &body, provided) {
		tracing::warn!(error = %err, "Webhook signature rejected.");

		return Err(json_error(
			StatusCode::UNAUTHORIZED,
			"UNAUTHORIZED",
			"Invalid webhook signature.",
			None,
		));
	}

	let payload: YelpWebhookRequest = match serde_json::from_slice(&body) {
		Ok(payload) => payload,
		Err(err) => {
			tracing::error!(error = %err, "Webhook payload could not be parsed.");

			return Err(ApiError::internal(WEBHOOK_FAILURE));
		},
	};

	match state.service.process_yelp_lead(&payload).await {
		Ok(lead) => Ok((StatusCode::CREATED, Json(lead))),
		Err(err) => {
			tracing::error!(
				error = %err,
				business_id = %payload.business_id,
				"Webhook processing failed."
			);

			Err(ApiError::internal(WEBHOOK_FAILURE))
		},
	}
}

/// Resolves the bearer token and exposes the session to dashboard handlers.
async fn require_session(
	State(state): State<AppState>,
	mut req: Request<Body>,
	next: Next,
) -> Response {
	let Some(token) = read_bearer_token(req.headers()).map(str::to_string) else {
		return json_error(
			StatusCode::UNAUTHORIZED,
			"UNAUTHORIZED",
			"Authentication required with a Bearer token.",
			None,
		)
		.into_response();
	};

	match state.service.authenticate(&token).await {
		Ok(user) => {
			req.extensions_mut().insert(user);

			next.run(req).await
		},
		Err(err) => ApiError::from(err).into_response(),
	}
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let (scheme, token) = raw.split_once(' ')?;

	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}

	let token = token.trim();

	if token.is_empty() { None } else { Some(token) }
}

async fn get_business(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
) -> Result<Json<BusinessView>, ApiError> {
	let response = state.service.get_business(&user.user_id).await?;

	Ok(Json(response))
}

async fn connect_business(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	payload: Result<Json<ConnectBusinessRequest>, JsonRejection>,
) -> Result<Json<BusinessView>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.connect_business(&user, payload).await?;

	Ok(Json(response))
}

async fn list_leads(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	filter: Result<Query<LeadFilter>, QueryRejection>,
) -> Result<Json<Vec<LeadView>>, ApiError> {
	let Query(filter) = filter?;
	let response = state.service.list_leads(&user.user_id, filter.status).await?;

	Ok(Json(response))
}

async fn create_lead(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	payload: Result<Json<ManualLeadRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LeadView>), ApiError> {
	let Json(payload) = payload?;
	let response = state.service.create_manual_lead(&user.user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn get_lead(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<LeadView>, ApiError> {
	let Path(lead_id) = path?;
	let response = state.service.get_lead(&user.user_id, lead_id).await?;

	Ok(Json(response))
}

async fn update_lead_status(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	path: Result<Path<Uuid>, PathRejection>,
	payload: Result<Json<UpdateLeadStatusRequest>, JsonRejection>,
) -> Result<Json<LeadView>, ApiError> {
	let Path(lead_id) = path?;
	let Json(payload) = payload?;
	let response = state.service.update_lead_status(&user.user_id, lead_id, payload).await?;

	Ok(Json(response))
}

async fn reply_to_lead(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	path: Result<Path<Uuid>, PathRejection>,
) -> Result<(StatusCode, Json<MessageView>), ApiError> {
	let Path(lead_id) = path?;
	let response = state.service.reply_to_lead(&user.user_id, lead_id).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn list_conversations(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
) -> Result<Json<Vec<ConversationView>>, ApiError> {
	let response = state.service.list_conversations(&user.user_id).await?;

	Ok(Json(response))
}

async fn get_conversation(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ConversationView>, ApiError> {
	let Path(conversation_id) = path?;
	let response = state.service.get_conversation(&user.user_id, conversation_id).await?;

	Ok(Json(response))
}

async fn post_message(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	path: Result<Path<Uuid>, PathRejection>,
	payload: Result<Json<PostMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageView>), ApiError> {
	let Path(conversation_id) = path?;
	let Json(payload) = payload?;
	let response =
		state.service.post_business_message(&user.user_id, conversation_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn list_templates(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
) -> Result<Json<Vec<TemplateView>>, ApiError> {
	let response = state.service.list_templates(&user.user_id).await?;

	Ok(Json(response))
}

async fn create_template(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	payload: Result<Json<CreateTemplateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TemplateView>), ApiError> {
	let Json(payload) = payload?;
	let response = state.service.create_template(&user.user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn update_template(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	path: Result<Path<Uuid>, PathRejection>,
	payload: Result<Json<UpdateTemplateRequest>, JsonRejection>,
) -> Result<Json<TemplateView>, ApiError> {
	let Path(template_id) = path?;
	let Json(payload) = payload?;
	let response = state.service.update_template(&user.user_id, template_id, payload).await?;

	Ok(Json(response))
}

async fn delete_template(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
	path: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ApiError> {
	let Path(template_id) = path?;
	state.service.delete_template(&user.user_id, template_id).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn metrics(
	State(state): State<AppState>,
	Extension(user): Extension<SessionUser>,
) -> Result<Json<BusinessMetrics>, ApiError> {
	let response = state.service.metrics(&user.user_id).await?;

	Ok(Json(response))
}
