//! HTTP route registration for the development store.

use axum::Router;
use axum::middleware;
use axum::routing::get;

use super::*;

pub(super) fn app_router(state: Arc<AppState>) -> Router {
    let identified = Router::new()
        .route(
            "/collections/:name",
            get(list_rows)
                .post(insert_row)
                .patch(update_rows)
                .delete(delete_rows),
        )
        .route("/whoami", get(whoami))
        .route("/admin/users", get(list_users).post(create_user))
        .route("/admin/users/search", get(search_users))
        .layer(middleware::from_fn_with_state(state.clone(), identify_caller));

    Router::new()
        .route("/healthz", get(healthz))
        .merge(identified)
        .with_state(state)
}
