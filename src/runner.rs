// src/runner.rs
//! One invocation of the watcher: refresh the snapshot if it is due, then send
//! at most one notification.
//!
//! Order of effects within a run:
//! fetch → parse → save → decide → notify → save.
//!
//! State is saved after every successful fetch, before anything is announced.
//! The announcement flag is saved only after the webhook accepted the message,
//! so a crash between the two re-sends that one message on the next run; it
//! never skips one.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::sanitize::excerpt;
use crate::error::RunError;
use crate::fetch::PageFetcher;
use crate::notify::Notifier;
use crate::specs::event_page;
use crate::state::{EventState, Stage};
use crate::store::StateStore;

/// Why a fetch happened this run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchReason {
    Empty,
    Stale,
    Forced,
    SaleWindow,
}

/// What a successful run did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOutcome {
    /// Fetches performed, in order.
    pub fetches: Vec<FetchReason>,
    /// The one message sent, if any.
    pub announced: Option<Stage>,
    /// The state as persisted at the end of the run.
    pub state: EventState,
}

impl RunOutcome {
    pub fn is_idle(&self) -> bool {
        self.announced.is_none()
    }
}

/// Run options that do not come from the environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    /// Fetch even if the stored snapshot is fresh.
    pub force_fetch: bool,
}

pub struct PollController<F, S, N> {
    config: Config,
    fetcher: F,
    store: S,
    notifier: N,
}

impl<F, S, N> PollController<F, S, N>
where
    F: PageFetcher,
    S: StateStore,
    N: Notifier,
{
    pub fn new(config: Config, fetcher: F, store: S, notifier: N) -> Self {
        Self { config, fetcher, store, notifier }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn run(&mut self, now: DateTime<Utc>, opts: RunOptions) -> Result<RunOutcome, RunError> {
        let mut state = self.store.load()?;
        let mut fetches = Vec::new();

        let reason = if state.release_date.is_none() {
            Some(FetchReason::Empty)
        } else if state.is_stale(now, self.config.check_interval()) {
            Some(FetchReason::Stale)
        } else if opts.force_fetch {
            Some(FetchReason::Forced)
        } else {
            None
        };

        if let Some(reason) = reason {
            state = self.refresh(&state, now, reason)?;
            fetches.push(reason);
        } else {
            debug!("Snapshot from {:?} is fresh; not fetching", state.last_checked_at);
        }

        let Some(release) = state.release_date else {
            // refresh always sets a release date; nothing to announce without one
            return Ok(RunOutcome { fetches, announced: None, state });
        };

        let stage = if !state.has_announced(Stage::NextDate) {
            Stage::NextDate
        } else if !state.has_announced(Stage::OnSale) && !state.has_announced(Stage::SoldOut) && now >= release {
            state = self.refresh(&state, now, FetchReason::SaleWindow)?;
            fetches.push(FetchReason::SaleWindow);
            match sale_window_stage(&state) {
                Some(stage) => stage,
                None => {
                    info!("Sold out already announced; nothing more for this listing");
                    return Ok(RunOutcome { fetches, announced: None, state });
                }
            }
        } else {
            info!("Nothing to announce (release {}, announced {:?})", release, state.announcements);
            return Ok(RunOutcome { fetches, announced: None, state });
        };

        self.announce(&mut state, stage)?;
        Ok(RunOutcome { fetches, announced: Some(stage), state })
    }

    /// Fetch, parse, merge, and persist. Nothing is saved if any step fails.
    fn refresh(&mut self, state: &EventState, now: DateTime<Utc>, reason: FetchReason) -> Result<EventState, RunError> {
        info!("Fetching listing ({:?})", reason);
        let raw = self.fetcher.fetch(&self.config.ids, self.config.session.as_ref())?;
        let snap = event_page::parse(&raw).inspect_err(|e| {
            warn!("Listing did not parse ({}): {}", e.reason, excerpt(&raw, 300));
        })?;

        let next = state.merge(&snap, now, self.config.cycle_match);
        if !state.announcements.is_empty() && next.announcements.is_empty() {
            warn!(
                "Release moved from {:?} to {:?}; treating as a new event and clearing announcements",
                state.release_date, next.release_date
            );
        }
        debug!("Snapshot: meet {:?}, release {:?}", next.meet_date, next.release_date);

        self.store.save(&next)?;
        Ok(next)
    }

    fn announce(&mut self, state: &mut EventState, stage: Stage) -> Result<(), RunError> {
        info!("Announcing {}", stage);
        self.notifier.send(stage, state)?;
        state.mark_announced(stage);
        self.store.save(state)?;
        Ok(())
    }
}

/// Which message the sale-window re-check calls for. `None` once the sold-out
/// message went out: "on sale" after "sold out" would be wrong.
pub fn sale_window_stage(state: &EventState) -> Option<Stage> {
    if !state.has_announced(Stage::NextDate) {
        // the re-check found a different listing; introduce it first
        Some(Stage::NextDate)
    } else if state.has_announced(Stage::SoldOut) {
        None
    } else if state.sold_out {
        Some(Stage::SoldOut)
    } else {
        Some(Stage::OnSale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Announcement;

    fn with(flags: &[Announcement], sold_out: bool) -> EventState {
        EventState { sold_out, announcements: flags.iter().copied().collect(), ..EventState::default() }
    }

    #[test]
    fn sale_window_prefers_sold_out_when_known() {
        let state = with(&[Announcement::NextDateAnnounced], true);
        assert_eq!(sale_window_stage(&state), Some(Stage::SoldOut));
    }

    #[test]
    fn sale_window_defaults_to_on_sale() {
        assert_eq!(sale_window_stage(&with(&[Announcement::NextDateAnnounced], false)), Some(Stage::OnSale));
    }

    #[test]
    fn nothing_follows_sold_out() {
        let done = with(&[Announcement::NextDateAnnounced, Announcement::SoldOutAnnounced], true);
        assert_eq!(sale_window_stage(&done), None);
    }

    #[test]
    fn sale_window_introduces_a_new_listing() {
        assert_eq!(sale_window_stage(&with(&[], false)), Some(Stage::NextDate));
    }
}
