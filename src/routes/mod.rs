use axum::routing::get;
use axum::Router;
use serde::Deserialize;

pub mod committee;
pub mod public;

/// Query string shared by every per-event operation (`?event_id=`).
#[derive(Deserialize)]
pub struct EventQuery {
    pub event_id: i64,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(public::index))
        .route("/about", get(public::about))
        .route("/class-sign-up", get(public::class_sign_up))
        .route("/cancel-sign-up", get(public::cancel_sign_up))
        .route("/book-taster-gi", get(public::book_taster_gi))
        .route("/register", get(public::register_page).post(public::register))
        .route("/login", get(public::login_page).post(public::login))
        .route("/logout", get(public::logout))
        .route("/sign-ups", get(committee::sign_ups))
        .route(
            "/new-event",
            get(committee::new_event_page).post(committee::new_event),
        )
        .route(
            "/edit-event",
            get(committee::edit_event_page).post(committee::edit_event),
        )
        .route("/members", get(committee::members))
        .route("/update-password", get(committee::update_password))
        .route("/update-role", get(committee::update_role))
}
