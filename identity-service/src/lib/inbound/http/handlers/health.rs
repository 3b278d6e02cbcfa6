use axum::http::StatusCode;

use super::ApiSuccess;

pub async fn health() -> ApiSuccess<String> {
    ApiSuccess::new(
        StatusCode::OK,
        "The server is up and running. Chat Server".to_string(),
    )
}
