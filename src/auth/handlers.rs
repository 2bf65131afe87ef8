use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::dto::{MessageResponse, RegisterRequest},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/api/register", post(register))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed register body");
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    match state.registration.register(payload).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(MessageResponse {
                message: "User registered successfully",
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
