use time::macros::{date, datetime, time};

use crate::models::event::{Event, NewEvent};
use crate::models::member::{Member, Role};
use crate::models::sign_up::SignUp;

pub fn mock_member() -> Member {
    Member {
        email: String::from("kano@club.org"),
        first_name: String::from("Jigoro"),
        last_name: String::from("Kano"),
        medical_info: String::from("None"),
        role: Role::Member,
        pass_hash: String::new(),
    }
}

pub fn mock_event(id: i64, capacity: i64) -> Event {
    Event {
        id,
        name: String::from("Fundamentals"),
        date: date!(2026 - 09 - 05),
        start_time: time!(18:00:00),
        end_time: time!(19:30:00),
        category: String::from("Gi"),
        capacity,
        location: String::from("The church hall"),
        location_link: None,
        topic: Some(String::from("Grip fighting")),
        coach: None,
    }
}

pub fn mock_sign_up(email: &str, event_id: i64, booked_gi: bool) -> SignUp {
    SignUp {
        email: email.to_owned(),
        event_id,
        registered_at: datetime!(2026-08-01 12:00:00 UTC),
        booked_gi,
    }
}

pub fn mock_new_event() -> NewEvent {
    NewEvent {
        name: String::from("Fundamentals"),
        date: String::from("2026-09-05"),
        start_time: String::from("18:00"),
        end_time: String::from("19:30"),
        category: String::from("Gi"),
        capacity: 12,
        location: String::from("The church hall"),
        location_link: None,
        topic: None,
        coach: None,
    }
}
