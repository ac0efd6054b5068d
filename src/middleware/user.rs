use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{error::AppError, routes::AppState};

/// Header identifying the calling user
pub const USER_ID_HEADER: &str = "x-user-id";

/// User the request acts on behalf of, stored in the request extensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

/// Resolves the caller from `x-user-id`, falling back to the configured default user
///
/// A header that is present but not a UUID is rejected with 400.
pub async fn current_user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(USER_ID_HEADER)
        .map(|value| value.to_str().map(str::trim));

    let user_id = match header {
        None => state.default_user_id,
        Some(Ok(value)) => match Uuid::parse_str(value) {
            Ok(id) => id,
            Err(_) => {
                return AppError::InvalidInput(format!("Invalid {} header", USER_ID_HEADER))
                    .into_response()
            }
        },
        Some(Err(_)) => {
            return AppError::InvalidInput(format!("Invalid {} header", USER_ID_HEADER))
                .into_response()
        }
    };

    request.extensions_mut().insert(CurrentUser(user_id));
    next.run(request).await
}
