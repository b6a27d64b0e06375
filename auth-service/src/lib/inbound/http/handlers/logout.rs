use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub const LOGOUT_MESSAGE: &str = "Successfully logged out";

pub async fn logout(
    State(state): State<AppState>,
    Extension(AuthenticatedUser(user)): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<LogoutResponseData>, ApiError> {
    state.auth_service.logout().await?;

    tracing::info!(user_id = %user.id, "User logout successful");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LogoutResponseData {
            message: LOGOUT_MESSAGE.to_string(),
            status_code: StatusCode::OK.as_u16(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponseData {
    pub message: String,
    pub status_code: u16,
}
