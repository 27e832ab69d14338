use super::*;

fn error_body(status: StatusCode, msg: &str) -> Response {
    (status, Json(serde_json::json!({"error": msg}))).into_response()
}

pub(super) fn unauthorized() -> Response {
    error_body(StatusCode::UNAUTHORIZED, "unauthorized")
}

pub(super) fn forbidden() -> Response {
    error_body(StatusCode::FORBIDDEN, "forbidden")
}

pub(super) fn not_found() -> Response {
    error_body(StatusCode::NOT_FOUND, "not found")
}

pub(super) fn conflict(msg: &str) -> Response {
    error_body(StatusCode::CONFLICT, msg)
}

pub(super) fn bad_request(err: anyhow::Error) -> Response {
    error_body(StatusCode::BAD_REQUEST, &err.to_string())
}

pub(super) fn internal_error(err: anyhow::Error) -> Response {
    tracing::error!(error = %format!("{:#}", err), "request failed");
    error_body(StatusCode::INTERNAL_SERVER_ERROR, &format!("{:#}", err))
}
