use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::RegisterIdentityCommand;
use crate::identity::models::RegisteredIdentity;
use crate::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Could not bind identity data");
        ApiError::from(rejection)
    })?;

    state
        .identity_service
        .register(body.into())
        .await
        .map_err(ApiError::from)
        .map(|registered| ApiSuccess::new(StatusCode::CREATED, registered.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    user_name: String,
    #[serde(default)]
    display_name: Option<String>,
    email: String,
    password: String,
}

impl From<RegisterRequest> for RegisterIdentityCommand {
    fn from(body: RegisterRequest) -> Self {
        Self {
            username: body.user_name,
            display_name: body.display_name,
            email: body.email,
            secret: body.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponseData {
    pub created_user_id: i32,
}

impl From<RegisteredIdentity> for RegisterResponseData {
    fn from(registered: RegisteredIdentity) -> Self {
        Self {
            created_user_id: registered.created_id.0,
        }
    }
}
