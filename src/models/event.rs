use serde::Deserialize;
use sqlx::MySqlPool;
use time::{Date, Time};

use crate::error::{AppError, AppResult};
use crate::util::{DATE_INPUT_FORMAT, TIME_FORMAT};

#[derive(Clone, sqlx::FromRow)]
pub struct Event {
    /// The ID of the event
    pub id: i64,
    /// The name of the event
    pub name: String,
    /// The day the session runs
    pub date: Date,
    /// When the session starts
    pub start_time: Time,
    /// When the session ends
    pub end_time: Time,
    /// The kind of session (fundamentals, open mat, etc.)
    pub category: String,
    /// How many mats-worth of people fit in the room
    pub capacity: i64,
    /// Where the session is held
    pub location: String,
    /// An optional map link for the location
    pub location_link: Option<String>,
    /// What the session covers, if announced
    pub topic: Option<String>,
    /// Who is coaching, if announced
    pub coach: Option<String>,
}

const EVENT_COLUMNS: &str = "id, name, date, start_time, end_time, category,
     capacity, location, location_link, topic, coach";

impl Event {
    pub async fn with_id(id: i64, pool: &MySqlPool) -> AppResult<Event> {
        Self::with_id_opt(id, pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No event with ID {}", id)))
    }

    pub async fn with_id_opt(id: i64, pool: &MySqlPool) -> AppResult<Option<Event>> {
        sqlx::query_as(&format!(
            "SELECT {} FROM event WHERE id = ?",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// All events on or after the given day, soonest first.
    pub async fn upcoming(today: Date, pool: &MySqlPool) -> AppResult<Vec<Self>> {
        sqlx::query_as(&format!(
            "SELECT {} FROM event WHERE date >= ? ORDER BY date, start_time",
            EVENT_COLUMNS
        ))
        .bind(today)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(new_event: &NewEvent, pool: &MySqlPool) -> AppResult<()> {
        let fields = new_event.parse()?;
        sqlx::query(
            "INSERT INTO event
             (name, date, start_time, end_time, category, capacity, location,
              location_link, topic, coach)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_event.name)
        .bind(fields.date)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(&new_event.category)
        .bind(new_event.capacity)
        .bind(&new_event.location)
        .bind(new_event.location_link())
        .bind(new_event.topic())
        .bind(new_event.coach())
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Full-row replace; the edit form resupplies every field.
    pub async fn update(id: i64, update: &NewEvent, pool: &MySqlPool) -> AppResult<()> {
        let fields = update.parse()?;
        sqlx::query(
            "UPDATE event
             SET name = ?, date = ?, start_time = ?, end_time = ?, category = ?,
                 capacity = ?, location = ?, location_link = ?, topic = ?, coach = ?
             WHERE id = ?",
        )
        .bind(&update.name)
        .bind(fields.date)
        .bind(fields.start_time)
        .bind(fields.end_time)
        .bind(&update.category)
        .bind(update.capacity)
        .bind(&update.location)
        .bind(update.location_link())
        .bind(update.topic())
        .bind(update.coach())
        .bind(id)
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// An event as it comes off the create/edit forms, dates and times still
/// in their `<input>` string shapes.
#[derive(Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    pub capacity: i64,
    pub location: String,
    pub location_link: Option<String>,
    pub topic: Option<String>,
    pub coach: Option<String>,
}

struct ParsedFields {
    date: Date,
    start_time: Time,
    end_time: Time,
}

impl NewEvent {
    // Browsers submit blank optional inputs as empty strings; store NULL.
    fn location_link(&self) -> Option<&str> {
        self.location_link.as_deref().filter(|s| !s.is_empty())
    }

    fn topic(&self) -> Option<&str> {
        self.topic.as_deref().filter(|s| !s.is_empty())
    }

    fn coach(&self) -> Option<&str> {
        self.coach.as_deref().filter(|s| !s.is_empty())
    }

    fn parse(&self) -> AppResult<ParsedFields> {
        let date = Date::parse(&self.date, DATE_INPUT_FORMAT)
            .map_err(|_| AppError::BadRequest(format!("Invalid date {}", self.date)))?;
        let start_time = Time::parse(&self.start_time, TIME_FORMAT)
            .map_err(|_| AppError::BadRequest(format!("Invalid time {}", self.start_time)))?;
        let end_time = Time::parse(&self.end_time, TIME_FORMAT)
            .map_err(|_| AppError::BadRequest(format!("Invalid time {}", self.end_time)))?;

        Ok(ParsedFields {
            date,
            start_time,
            end_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use crate::tests::mock::mock_new_event;

    use super::*;

    #[test]
    fn form_dates_and_times_parse() {
        let form = mock_new_event();
        let fields = form.parse().unwrap();

        assert_eq!(fields.date, date!(2026 - 09 - 05));
        assert_eq!(fields.start_time, time!(18:00:00));
        assert_eq!(fields.end_time, time!(19:30:00));
    }

    #[test]
    fn garbage_dates_are_rejected() {
        let mut form = mock_new_event();
        form.date = "next tuesday".to_owned();

        assert!(matches!(form.parse(), Err(AppError::BadRequest(_))));
    }
}
