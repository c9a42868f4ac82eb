//! Committee-only pages: event management, rosters, and the member
//! directory. Every handler checks the committee gate first; administrators
//! pass it implicitly.

use askama::Template;
use axum::extract::{Extension, Form, Query};
use axum::response::{Html, Response};
use serde::Deserialize;
use sqlx::MySqlPool;

use crate::auth::LoggedIn;
use crate::error::AppResult;
use crate::models::event::{Event, NewEvent};
use crate::models::member::{Member, Role};
use crate::models::sign_up::{RosterEntry, SignUp};
use crate::routes::EventQuery;
use crate::util::{format_date, format_date_input, format_time, redirect};

#[derive(Template)]
#[template(path = "committee/sign_ups.html")]
struct RosterPage {
    user: Option<Member>,
    event: EventDetails,
    roster: Vec<RosterEntry>,
}

#[derive(Template)]
#[template(path = "committee/new_event.html")]
struct NewEventPage {
    user: Option<Member>,
}

#[derive(Template)]
#[template(path = "committee/edit_event.html")]
struct EditEventPage {
    user: Option<Member>,
    form: EventFormValues,
}

#[derive(Template)]
#[template(path = "committee/members.html")]
struct MembersPage {
    user: Option<Member>,
    members: Vec<Member>,
}

/// An event formatted for display on the roster page.
struct EventDetails {
    name: String,
    date: String,
    start_time: String,
    end_time: String,
    category: String,
    capacity: i64,
    location: String,
}

impl From<Event> for EventDetails {
    fn from(event: Event) -> Self {
        Self {
            name: event.name,
            date: format_date(event.date),
            start_time: format_time(event.start_time),
            end_time: format_time(event.end_time),
            category: event.category,
            capacity: event.capacity,
            location: event.location,
        }
    }
}

/// An event formatted for the edit form's `<input>` values.
struct EventFormValues {
    id: i64,
    name: String,
    date: String,
    start_time: String,
    end_time: String,
    category: String,
    capacity: i64,
    location: String,
    location_link: String,
    topic: String,
    coach: String,
}

impl From<Event> for EventFormValues {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            date: format_date_input(event.date),
            start_time: format_time(event.start_time),
            end_time: format_time(event.end_time),
            category: event.category,
            capacity: event.capacity,
            location: event.location,
            location_link: event.location_link.unwrap_or_default(),
            topic: event.topic.unwrap_or_default(),
            coach: event.coach.unwrap_or_default(),
        }
    }
}

pub async fn sign_ups(
    LoggedIn(member): LoggedIn,
    Query(query): Query<EventQuery>,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Html<String>> {
    member.require(Role::Committee)?;

    let event = Event::with_id(query.event_id, &pool).await?;
    let roster = SignUp::roster(query.event_id, &pool).await?;

    let page = RosterPage {
        user: Some(member),
        event: event.into(),
        roster,
    };
    Ok(Html(page.render()?))
}

pub async fn new_event_page(LoggedIn(member): LoggedIn) -> AppResult<Html<String>> {
    member.require(Role::Committee)?;

    let page = NewEventPage { user: Some(member) };
    Ok(Html(page.render()?))
}

pub async fn new_event(
    LoggedIn(member): LoggedIn,
    Extension(pool): Extension<MySqlPool>,
    Form(new_event): Form<NewEvent>,
) -> AppResult<Response> {
    member.require(Role::Committee)?;

    Event::create(&new_event, &pool).await?;
    Ok(redirect("/new-event"))
}

pub async fn edit_event_page(
    LoggedIn(member): LoggedIn,
    Query(query): Query<EventQuery>,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Html<String>> {
    member.require(Role::Committee)?;

    let event = Event::with_id(query.event_id, &pool).await?;

    let page = EditEventPage {
        user: Some(member),
        form: event.into(),
    };
    Ok(Html(page.render()?))
}

#[derive(Deserialize)]
pub struct EditEventForm {
    event_id: i64,
    name: String,
    date: String,
    start_time: String,
    end_time: String,
    category: String,
    capacity: i64,
    location: String,
    location_link: Option<String>,
    topic: Option<String>,
    coach: Option<String>,
}

impl EditEventForm {
    fn into_parts(self) -> (i64, NewEvent) {
        (
            self.event_id,
            NewEvent {
                name: self.name,
                date: self.date,
                start_time: self.start_time,
                end_time: self.end_time,
                category: self.category,
                capacity: self.capacity,
                location: self.location,
                location_link: self.location_link,
                topic: self.topic,
                coach: self.coach,
            },
        )
    }
}

pub async fn edit_event(
    LoggedIn(member): LoggedIn,
    Extension(pool): Extension<MySqlPool>,
    Form(form): Form<EditEventForm>,
) -> AppResult<Response> {
    member.require(Role::Committee)?;

    let (event_id, update) = form.into_parts();
    Event::with_id(event_id, &pool).await?;
    Event::update(event_id, &update, &pool).await?;
    Ok(redirect("/"))
}

pub async fn members(
    LoggedIn(member): LoggedIn,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Html<String>> {
    member.require(Role::Committee)?;

    let members = Member::all(&pool).await?;
    let page = MembersPage {
        user: Some(member),
        members,
    };
    Ok(Html(page.render()?))
}

#[derive(Deserialize)]
pub struct PasswordQuery {
    email: String,
    password: String,
}

pub async fn update_password(
    LoggedIn(member): LoggedIn,
    Query(query): Query<PasswordQuery>,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Response> {
    member.require(Role::Committee)?;

    Member::set_password(&query.email, &query.password, &pool).await?;
    Ok(redirect("/members"))
}

#[derive(Deserialize)]
pub struct RoleQuery {
    email: String,
    user_role: String,
}

pub async fn update_role(
    LoggedIn(member): LoggedIn,
    Query(query): Query<RoleQuery>,
    Extension(pool): Extension<MySqlPool>,
) -> AppResult<Response> {
    member.require(Role::Committee)?;

    let role = query.user_role.parse::<Role>()?;
    Member::set_role(&query.email, role, &pool).await?;
    Ok(redirect("/members"))
}
