use std::collections::HashMap;

use sqlx::MySqlPool;
use time::OffsetDateTime;

use crate::error::AppResult;
use crate::util::current_time;

/// One row of the sign-up ledger: a member attending an event, with an
/// optional loaner gi booked for taster sessions.
#[derive(Clone, sqlx::FromRow)]
pub struct SignUp {
    pub email: String,
    pub event_id: i64,
    pub registered_at: OffsetDateTime,
    pub booked_gi: bool,
}

/// A ledger row joined with the member's name, for the committee roster page.
#[derive(sqlx::FromRow)]
pub struct RosterEntry {
    pub first_name: String,
    pub last_name: String,
    pub booked_gi: bool,
}

impl SignUp {
    /// Every event the member has signed up for, across all dates.
    pub async fn for_member(email: &str, pool: &MySqlPool) -> AppResult<Vec<Self>> {
        sqlx::query_as(
            "SELECT email, event_id, registered_at, booked_gi
             FROM sign_up WHERE email = ?",
        )
        .bind(email)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Signs a member up for an event, stamped with the current time.
    /// A member can hold at most one sign-up per event, so an existing row
    /// makes this a no-op rather than a duplicate.
    pub async fn create(email: &str, event_id: i64, pool: &MySqlPool) -> AppResult<()> {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT event_id FROM sign_up WHERE email = ? AND event_id = ?")
                .bind(email)
                .bind(event_id)
                .fetch_optional(pool)
                .await?;
        if existing.is_some() {
            return Ok(());
        }

        sqlx::query(
            "INSERT INTO sign_up (email, event_id, registered_at, booked_gi)
             VALUES (?, ?, ?, FALSE)",
        )
        .bind(email)
        .bind(event_id)
        .bind(current_time())
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Cancelling a sign-up that doesn't exist is a silent no-op.
    pub async fn delete(email: &str, event_id: i64, pool: &MySqlPool) -> AppResult<()> {
        sqlx::query("DELETE FROM sign_up WHERE email = ? AND event_id = ?")
            .bind(email)
            .bind(event_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Books a loaner gi on an existing sign-up; a no-op when no row matches.
    pub async fn book_gi(email: &str, event_id: i64, pool: &MySqlPool) -> AppResult<()> {
        sqlx::query("UPDATE sign_up SET booked_gi = TRUE WHERE email = ? AND event_id = ?")
            .bind(email)
            .bind(event_id)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Total sign-ups per event, one query for the whole id set.
    pub async fn count_per_event(
        event_ids: &[i64],
        pool: &MySqlPool,
    ) -> AppResult<HashMap<i64, i64>> {
        Self::aggregate(event_ids, "", pool).await
    }

    /// Booked gis per event, one query for the whole id set.
    pub async fn gi_count_per_event(
        event_ids: &[i64],
        pool: &MySqlPool,
    ) -> AppResult<HashMap<i64, i64>> {
        Self::aggregate(event_ids, "AND booked_gi = TRUE", pool).await
    }

    async fn aggregate(
        event_ids: &[i64],
        filter: &str,
        pool: &MySqlPool,
    ) -> AppResult<HashMap<i64, i64>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; event_ids.len()].join(", ");
        let sql = format!(
            "SELECT event_id, COUNT(*) FROM sign_up
             WHERE event_id IN ({}) {} GROUP BY event_id",
            placeholders, filter
        );

        let mut query = sqlx::query_as::<_, (i64, i64)>(&sql);
        for id in event_ids {
            query = query.bind(*id);
        }

        let counts = query.fetch_all(pool).await?;
        Ok(counts.into_iter().collect())
    }

    /// The names and gi bookings for everyone signed up to an event.
    pub async fn roster(event_id: i64, pool: &MySqlPool) -> AppResult<Vec<RosterEntry>> {
        sqlx::query_as(
            "SELECT member.first_name, member.last_name, sign_up.booked_gi
             FROM sign_up
             INNER JOIN member ON member.email = sign_up.email
             WHERE sign_up.event_id = ?
             ORDER BY sign_up.registered_at",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
