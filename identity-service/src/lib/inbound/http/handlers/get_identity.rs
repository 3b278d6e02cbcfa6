use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::Identity;
use crate::identity::models::IdentityId;
use crate::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn get_identity<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    Path(identity_id): Path<String>,
) -> Result<ApiSuccess<GetIdentityResponseData>, ApiError> {
    let identity_id = identity_id
        .parse::<i32>()
        .map(IdentityId)
        .map_err(|e| ApiError::BadRequest(format!("invalid identity id: {}", e)))?;

    state
        .identity_service
        .get_identity(identity_id)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::OK, identity.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetIdentityResponseData {
    pub id: i32,
    pub user_name: String,
    pub display_name: Option<String>,
    pub email: String,
    pub created: DateTime<Utc>,
}

impl From<&Identity> for GetIdentityResponseData {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.0,
            user_name: identity.username.as_str().to_string(),
            display_name: identity.display_name.clone(),
            email: identity.email.as_str().to_string(),
            created: identity.created_at,
        }
    }
}
