//! Builds the schedule page's view of upcoming events: each event annotated
//! with how many seats are left and whether the viewer is already on the mat.

use std::collections::{HashMap, HashSet};

use sqlx::MySqlPool;
use time::Date;

use crate::error::AppResult;
use crate::models::event::Event;
use crate::models::member::Member;
use crate::models::sign_up::SignUp;
use crate::util::{format_date, format_time};

/// One upcoming event as the schedule page shows it, from the point of view
/// of a particular (possibly anonymous) visitor.
pub struct EventView {
    pub id: i64,
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub category: String,
    /// Stated capacity minus total sign-ups. Not clamped: an overbooked
    /// session shows a negative number.
    pub remaining: i64,
    pub location: String,
    pub location_link: Option<String>,
    /// Whether the viewer holds a sign-up for this event
    pub registered: bool,
    pub sign_up_count: i64,
    /// Whether the viewer booked a loaner gi; only ever true when registered
    pub booked_gi: bool,
    pub gis_booked: i64,
    pub topic: Option<String>,
    pub coach: Option<String>,
}

pub struct Schedule {
    pub events: Vec<EventView>,
}

impl Schedule {
    /// Assembles the schedule for a given day and viewer. Runs one query for
    /// the events, one for the viewer's own sign-ups, and two bulk aggregates
    /// over the whole event id set, however many events there are.
    pub async fn load(
        today: Date,
        viewer: Option<&Member>,
        pool: &MySqlPool,
    ) -> AppResult<Schedule> {
        let events = Event::upcoming(today, pool).await?;

        let viewer_sign_ups = match viewer {
            Some(member) => SignUp::for_member(&member.email, pool).await?,
            None => Vec::new(),
        };

        let event_ids: Vec<i64> = events.iter().map(|event| event.id).collect();
        let sign_up_counts = SignUp::count_per_event(&event_ids, pool).await?;
        let gi_counts = SignUp::gi_count_per_event(&event_ids, pool).await?;

        Ok(Schedule {
            events: build_views(events, &viewer_sign_ups, &sign_up_counts, &gi_counts),
        })
    }
}

/// The pure projection step: folds the viewer's ledger rows and the bulk
/// aggregates into one display row per event.
fn build_views(
    events: Vec<Event>,
    viewer_sign_ups: &[SignUp],
    sign_up_counts: &HashMap<i64, i64>,
    gi_counts: &HashMap<i64, i64>,
) -> Vec<EventView> {
    let registered_ids: HashSet<i64> = viewer_sign_ups
        .iter()
        .map(|sign_up| sign_up.event_id)
        .collect();
    let gi_flags: HashMap<i64, bool> = viewer_sign_ups
        .iter()
        .map(|sign_up| (sign_up.event_id, sign_up.booked_gi))
        .collect();

    events
        .into_iter()
        .map(|event| {
            let sign_up_count = sign_up_counts.get(&event.id).copied().unwrap_or(0);
            let registered = registered_ids.contains(&event.id);
            let booked_gi = registered && gi_flags.get(&event.id).copied().unwrap_or(false);

            EventView {
                id: event.id,
                name: event.name,
                date: format_date(event.date),
                start_time: format_time(event.start_time),
                end_time: format_time(event.end_time),
                category: event.category,
                remaining: event.capacity - sign_up_count,
                location: event.location,
                location_link: event.location_link,
                registered,
                sign_up_count,
                booked_gi,
                gis_booked: gi_counts.get(&event.id).copied().unwrap_or(0),
                topic: event.topic,
                coach: event.coach,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::tests::mock::{mock_event, mock_sign_up};

    use super::*;

    fn counts(pairs: &[(i64, i64)]) -> HashMap<i64, i64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_catalog_yields_an_empty_schedule() {
        let views = build_views(Vec::new(), &[], &HashMap::new(), &HashMap::new());
        assert!(views.is_empty());
    }

    #[test]
    fn anonymous_viewer_sees_full_capacity() {
        let event = mock_event(1, 2);
        let views = build_views(vec![event], &[], &HashMap::new(), &HashMap::new());

        assert_eq!(views.len(), 1);
        assert_eq!(views[0].remaining, 2);
        assert!(!views[0].registered);
        assert!(!views[0].booked_gi);
    }

    #[test]
    fn remaining_capacity_is_capacity_minus_sign_ups() {
        let views = build_views(
            vec![mock_event(1, 12)],
            &[],
            &counts(&[(1, 5)]),
            &HashMap::new(),
        );

        assert_eq!(views[0].remaining, 7);
        assert_eq!(views[0].sign_up_count, 5);
    }

    #[test]
    fn overbooked_events_go_negative() {
        let views = build_views(
            vec![mock_event(1, 2)],
            &[],
            &counts(&[(1, 3)]),
            &HashMap::new(),
        );

        assert_eq!(views[0].remaining, -1);
    }

    #[test]
    fn registered_viewer_and_stranger_see_the_same_count() {
        let event = mock_event(1, 2);
        let a_sign_ups = [mock_sign_up("a@club.org", 1, false)];

        // viewer A, who signed up without a gi
        let for_a = build_views(
            vec![event.clone()],
            &a_sign_ups,
            &counts(&[(1, 1)]),
            &HashMap::new(),
        );
        assert!(for_a[0].registered);
        assert!(!for_a[0].booked_gi);
        assert_eq!(for_a[0].remaining, 1);

        // viewer B, who didn't
        let for_b = build_views(vec![event], &[], &counts(&[(1, 1)]), &HashMap::new());
        assert!(!for_b[0].registered);
        assert_eq!(for_b[0].remaining, 1);
    }

    #[test]
    fn gi_flag_only_shows_for_the_event_it_was_booked_on() {
        let events = vec![mock_event(1, 10), mock_event(2, 10)];
        let sign_ups = [
            mock_sign_up("a@club.org", 1, true),
            mock_sign_up("a@club.org", 2, false),
        ];

        let views = build_views(
            events,
            &sign_ups,
            &counts(&[(1, 1), (2, 1)]),
            &counts(&[(1, 1)]),
        );

        assert!(views[0].booked_gi);
        assert_eq!(views[0].gis_booked, 1);
        assert!(!views[1].booked_gi);
        assert_eq!(views[1].gis_booked, 0);
    }

    #[test]
    fn cancelled_sign_up_no_longer_shows_as_registered() {
        // after a sign-up then cancel, the ledger holds no row for the viewer
        let views = build_views(
            vec![mock_event(1, 2)],
            &[],
            &HashMap::new(),
            &HashMap::new(),
        );

        assert!(!views[0].registered);
        assert!(!views[0].booked_gi);
        assert_eq!(views[0].remaining, 2);
    }

    #[test]
    fn gi_booking_never_shows_without_a_registration() {
        // a stale gi aggregate must not mark an unregistered viewer
        let views = build_views(
            vec![mock_event(1, 2)],
            &[],
            &counts(&[(1, 1)]),
            &counts(&[(1, 1)]),
        );

        assert!(!views[0].registered);
        assert!(!views[0].booked_gi);
        assert_eq!(views[0].gis_booked, 1);
    }
}
