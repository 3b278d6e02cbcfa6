use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::LoginCommand;
use crate::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Failed logins share one message so callers cannot probe which accounts exist.
pub const LOGIN_REJECTED: &str = "invalid login or password";

pub async fn login<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Could not bind login data");
        ApiError::from(rejection)
    })?;

    let outcome = state.identity_service.authenticate(body.into()).await?;

    match outcome.reason {
        None if outcome.success => Ok(ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                message: "login succeed".to_string(),
            },
        )),
        reason => {
            tracing::info!(
                reason_code = reason.map(|r| r.code()),
                reason = reason.map(|r| r.description()),
                "Login rejected"
            );
            Err(ApiError::Unauthorized(LOGIN_REJECTED.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    login: String,
    password: String,
}

impl From<LoginRequest> for LoginCommand {
    fn from(body: LoginRequest) -> Self {
        Self {
            login: body.login,
            secret: body.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
}
