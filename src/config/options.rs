// src/config/options.rs
use std::fmt;
use std::path::PathBuf;

use chrono::TimeDelta;
use thiserror::Error;

use super::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a whole number of milliseconds, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} must be `date` or `day-of-month`, got {value:?}")]
    InvalidCycleMatch { key: &'static str, value: String },
}

/// Which listing on the ticket site we follow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventIds {
    pub root_event_id: String,
    pub event_id: String,
}

impl EventIds {
    /// Fill the `{root}` and `{event}` placeholders of a URL template.
    pub fn fill(&self, tmpl: &str) -> String {
        tmpl.replace("{root}", &self.root_event_id)
            .replace("{event}", &self.event_id)
    }
}

impl Default for EventIds {
    fn default() -> Self {
        Self {
            root_event_id: s!(ROOT_EVENT_ID),
            event_id: s!(EVENT_ID),
        }
    }
}

/// How two release dates are compared when deciding whether the listing was
/// replaced by a new event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CycleMatch {
    /// Same UTC calendar date.
    #[default]
    CalendarDate,
    /// Same day of month only; month and year are ignored.
    DayOfMonth,
}

impl CycleMatch {
    fn parse(key: &'static str, value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" | "calendar-date" => Ok(CycleMatch::CalendarDate),
            "day-of-month" | "day" => Ok(CycleMatch::DayOfMonth),
            _ => Err(ConfigError::InvalidCycleMatch { key, value: s!(value) }),
        }
    }
}

/// Prints the same spelling the environment variable accepts.
impl fmt::Display for CycleMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CycleMatch::CalendarDate => "date",
            CycleMatch::DayOfMonth => "day-of-month",
        })
    }
}

/// Session cookie handed to the page fetch. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCredential(***)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub ids: EventIds,
    /// Page URL with `{root}` and `{event}` placeholders.
    pub page_url: String,
    pub check_interval_ms: u64,
    /// Chat webhook URL.
    pub notify_target: String,
    /// Injected at the start of every message.
    pub mention_id: String,
    pub state_path: PathBuf,
    pub log_file: PathBuf,
    pub cycle_match: CycleMatch,
    pub session: Option<SessionCredential>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ids: EventIds::default(),
            page_url: s!(PAGE_URL_TMPL),
            check_interval_ms: CHECK_INTERVAL_MS,
            notify_target: s!(),
            mention_id: s!(),
            state_path: PathBuf::from(STORE_DIR).join(STATE_FILE),
            log_file: PathBuf::from(STORE_DIR).join(LOG_FILE),
            cycle_match: CycleMatch::default(),
            session: None,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is normal in production.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut cfg = Config::default();

        if let Some(v) = get(ENV_ROOT_EVENT_ID) { cfg.ids.root_event_id = v; }
        if let Some(v) = get(ENV_EVENT_ID) { cfg.ids.event_id = v; }
        if let Some(v) = get(ENV_PAGE_URL) { cfg.page_url = v; }
        if let Some(v) = get(ENV_WEBHOOK_URL) { cfg.notify_target = v; }
        if let Some(v) = get(ENV_MENTION_ID) { cfg.mention_id = v; }
        if let Some(v) = get(ENV_STATE_PATH) { cfg.state_path = PathBuf::from(v); }
        if let Some(v) = get(ENV_LOG_FILE) { cfg.log_file = PathBuf::from(v); }
        if let Some(v) = get(ENV_SESSION) { cfg.session = Some(SessionCredential::new(v)); }

        if let Some(v) = get(ENV_CHECK_INTERVAL_MS) {
            cfg.check_interval_ms = v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                key: ENV_CHECK_INTERVAL_MS,
                value: v.clone(),
            })?;
        }
        if let Some(v) = get(ENV_CYCLE_MATCH) {
            cfg.cycle_match = CycleMatch::parse(ENV_CYCLE_MATCH, &v)?;
        }

        Ok(cfg)
    }

    pub fn check_interval(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::try_from(self.check_interval_ms).unwrap_or(i64::MAX))
    }

    /// The listing URL with both identifiers filled in.
    pub fn page_url(&self) -> String {
        self.ids.fill(&self.page_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = Config::from_lookup(|_| None).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.check_interval(), TimeDelta::hours(1));
        assert!(cfg.state_path.ends_with("state.json"));
    }

    #[test]
    fn overrides_and_url_template() {
        let cfg = Config::from_lookup(lookup_from(&[
            (ENV_ROOT_EVENT_ID, "club"),
            (ENV_EVENT_ID, "july"),
            (ENV_PAGE_URL, "https://t.test/{root}/events/{event}"),
            (ENV_CHECK_INTERVAL_MS, "900000"),
            (ENV_CYCLE_MATCH, "day-of-month"),
            (ENV_SESSION, "sid=abc"),
            (ENV_MENTION_ID, ""),
        ]))
        .unwrap();

        assert_eq!(cfg.page_url(), "https://t.test/club/events/july");
        assert_eq!(cfg.check_interval(), TimeDelta::minutes(15));
        assert_eq!(cfg.cycle_match, CycleMatch::DayOfMonth);
        assert_eq!(cfg.session.as_ref().map(|s| s.expose()), Some("sid=abc"));
        assert_eq!(cfg.mention_id, "");
    }

    #[test]
    fn bad_interval_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[(ENV_CHECK_INTERVAL_MS, "soon")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));
    }

    #[test]
    fn cycle_match_display_reads_back() {
        for m in [CycleMatch::CalendarDate, CycleMatch::DayOfMonth] {
            let cfg = Config::from_lookup(lookup_from(&[(ENV_CYCLE_MATCH, m.to_string().as_str())])).unwrap();
            assert_eq!(cfg.cycle_match, m);
        }
        assert_eq!(CycleMatch::default().to_string(), "date");
    }

    #[test]
    fn credential_is_redacted_in_debug() {
        let cred = SessionCredential::new("secret-cookie");
        assert!(!format!("{cred:?}").contains("secret"));
    }
}
