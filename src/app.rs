use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/api/habits/:id",
            get(handlers::get_habit)
                .patch(handlers::update_habit)
                .delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/habits/:id/share", get(handlers::share_habit))
        .route("/api/habit-order", put(handlers::reorder_habits))
        .route(
            "/api/backup",
            get(handlers::export_backup).post(handlers::import_backup),
        )
        .route(
            "/api/widget/config",
            get(handlers::get_widget_config).put(handlers::set_widget_config),
        )
        .route("/api/widget", get(handlers::get_widget))
        .with_state(state)
}
