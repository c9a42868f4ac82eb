//! The member-facing pages: the schedule, account registration, login, and
//! the three sign-up ledger operations. Every mutating handler redirects
//! back to the schedule.

use std::sync::Arc;

use askama::Template;
use axum::extract::{Extension, Form, Query};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use sqlx::MySqlPool;

use crate::auth::{clear_session_cookie, issue_token, session_cookie, LoggedIn, Viewer};
use crate::config::AppConfig;
use crate::error::AppResult;
use crate::models::member::{Member, NewMember};
use crate::models::sign_up::SignUp;
use crate::routes::EventQuery;
use crate::schedule::{EventView, Schedule};
use crate::util::{redirect, redirect_with_cookie, today};

const LOGIN_FAILED: &str =
    "Invalid email or password. Ask a committee member if you've forgotten your login.";

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage {
    user: Option<Member>,
    events: Vec<EventView>,
}

#[derive(Template)]
#[template(path = "about.html")]
struct AboutPage {
    user: Option<Member>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage {
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterPage;

pub async fn index(
    Viewer(viewer): Viewer,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Html<String>> {
    let schedule = Schedule::load(today(), viewer.as_ref(), &pool).await?;

    let page = IndexPage {
        user: viewer,
        events: schedule.events,
    };
    Ok(Html(page.render()?))
}

pub async fn about(Viewer(viewer): Viewer) -> AppResult<Html<String>> {
    let page = AboutPage { user: viewer };
    Ok(Html(page.render()?))
}

pub async fn class_sign_up(
    LoggedIn(member): LoggedIn,
    Query(query): Query<EventQuery>,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Response> {
    SignUp::create(&member.email, query.event_id, &pool).await?;
    Ok(redirect("/"))
}

pub async fn cancel_sign_up(
    LoggedIn(member): LoggedIn,
    Query(query): Query<EventQuery>,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Response> {
    SignUp::delete(&member.email, query.event_id, &pool).await?;
    Ok(redirect("/"))
}

pub async fn book_taster_gi(
    LoggedIn(member): LoggedIn,
    Query(query): Query<EventQuery>,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Response> {
    SignUp::book_gi(&member.email, query.event_id, &pool).await?;
    Ok(redirect("/"))
}

pub async fn register_page() -> AppResult<Html<String>> {
    Ok(Html(RegisterPage.render()?))
}

pub async fn register(
    Extension(pool): Extension<MySqlPool>,
    Form(new_member): Form<NewMember>,
) -> AppResult<Response> {
    Member::register(new_member, &pool).await?;
    Ok(redirect("/login"))
}

pub async fn login_page() -> AppResult<Html<String>> {
    let page = LoginPage { error: None };
    Ok(Html(page.render()?))
}

#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

/// Unknown emails and wrong passwords get the same message, so the form
/// can't be used to probe which emails have accounts.
pub async fn login(
    Extension(pool): Extension<MySqlPool>,
    Extension(config): Extension<Arc<AppConfig>>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if let Some(member) = Member::with_email_opt(&form.email, &pool).await? {
        if member.verify_password(&form.password)? {
            let token = issue_token(&member.email, &config.secret_key)?;
            return Ok(redirect_with_cookie("/", &session_cookie(&token)));
        }
    }

    let page = LoginPage {
        error: Some(LOGIN_FAILED.to_owned()),
    };
    Ok(Html(page.render()?).into_response())
}

pub async fn logout() -> Response {
    redirect_with_cookie("/", &clear_session_cookie())
}
