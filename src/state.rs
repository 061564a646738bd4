// src/state.rs
//! What we know about the tracked event and what has already been announced.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CycleMatch;
use crate::specs::Snapshot;

/// A lifecycle notification that has been sent for the current event cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Announcement {
    NextDateAnnounced,
    TicketsOnSaleAnnounced,
    SoldOutAnnounced,
}

/// Lifecycle milestone; each one maps to exactly one message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    NextDate,
    OnSale,
    SoldOut,
}

impl Stage {
    pub fn flag(self) -> Announcement {
        match self {
            Stage::NextDate => Announcement::NextDateAnnounced,
            Stage::OnSale => Announcement::TicketsOnSaleAnnounced,
            Stage::SoldOut => Announcement::SoldOutAnnounced,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::NextDate => "next date",
            Stage::OnSale => "on sale",
            Stage::SoldOut => "sold out",
        })
    }
}

/// The persisted record. One per tracked listing, replaced whole on every save.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventState {
    /// When sales open. `None` until the first successful fetch.
    pub release_date: Option<DateTime<Utc>>,
    pub meet_date: Option<DateTime<Utc>>,
    pub sold_out: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Only ever grows, except on a new event cycle.
    pub announcements: BTreeSet<Announcement>,
}

impl EventState {
    pub fn has_announced(&self, stage: Stage) -> bool {
        self.announcements.contains(&stage.flag())
    }

    pub fn mark_announced(&mut self, stage: Stage) {
        self.announcements.insert(stage.flag());
    }

    /// A fetch is due when nothing is known yet or the last check is older
    /// than `interval`.
    pub fn is_stale(&self, now: DateTime<Utc>, interval: TimeDelta) -> bool {
        match (self.release_date, self.last_checked_at) {
            (Some(_), Some(checked)) => now - checked > interval,
            _ => true,
        }
    }

    /// Whether `release` belongs to a different listing than the one stored.
    pub fn starts_new_cycle(&self, release: DateTime<Utc>, cycle: CycleMatch) -> bool {
        let Some(known) = self.release_date else { return true };
        match cycle {
            CycleMatch::CalendarDate => known.date_naive() != release.date_naive(),
            CycleMatch::DayOfMonth => known.day() != release.day(),
        }
    }

    /// State after reading `snap` at `now`. Announcements carry over unless the
    /// release date moved to another day.
    pub fn merge(&self, snap: &Snapshot, now: DateTime<Utc>, cycle: CycleMatch) -> EventState {
        let release = release_at(now, snap.seconds_until_release);
        let announcements = if self.starts_new_cycle(release, cycle) {
            BTreeSet::new()
        } else {
            self.announcements.clone()
        };

        EventState {
            release_date: Some(release),
            meet_date: Some(snap.meet_date),
            sold_out: snap.sold_out,
            last_checked_at: Some(now),
            announcements,
        }
    }
}

/// `now + seconds`, saturating at chrono's representable range.
pub fn release_at(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if seconds < 0 { DateTime::<Utc>::MIN_UTC } else { DateTime::<Utc>::MAX_UTC })
}
