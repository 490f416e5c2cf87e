use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/api/activities",
            get(handlers::list_activities).post(handlers::create_activity),
        )
        .route("/api/activities/:id", delete(handlers::delete_activity))
        .route("/api/meals", get(handlers::list_meals).post(handlers::create_meal))
        .route("/api/meals/:id", delete(handlers::delete_meal))
        .route("/api/sleep", get(handlers::list_sleep).post(handlers::create_sleep))
        .route("/api/sleep/:id", delete(handlers::delete_sleep))
        .route(
            "/api/heart-rate",
            get(handlers::list_heart_rate).post(handlers::create_heart_rate),
        )
        .route("/api/heart-rate/:id", delete(handlers::delete_heart_rate))
        .route(
            "/api/schedule",
            get(handlers::list_schedule).post(handlers::create_schedule),
        )
        .route(
            "/api/schedule/:id",
            put(handlers::update_schedule).delete(handlers::delete_schedule),
        )
        .route("/api/workouts", get(handlers::list_workouts))
        .route("/api/workouts/:id/start", post(handlers::start_workout))
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route("/api/stats/nutrition", get(handlers::nutrition_stats))
        .route("/api/stats/sleep", get(handlers::sleep_stats))
        .route("/api/stats/heart-rate", get(handlers::heart_rate_stats))
        .route("/api/stats/activities", get(handlers::activity_stats))
        .route("/api/stats/profile", get(handlers::profile_stats))
        .route("/api/end-time", get(handlers::end_time))
        .route("/api/data-counts", get(handlers::data_counts))
        .route("/api/export", get(handlers::export))
        .with_state(state)
}
