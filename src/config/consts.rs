// src/config/consts.rs

// Listing
pub const ROOT_EVENT_ID: &str = "meetup";
pub const EVENT_ID: &str = "meetup-next";
pub const PAGE_URL_TMPL: &str = "https://tickets.example.com/e/{root}/{event}";

// Net
pub const REQUEST_TIMEOUT_SECS: u64 = 15;
pub const USER_AGENT: &str = concat!("ticket_watch/", env!("CARGO_PKG_VERSION"));

// Local store
pub const STORE_DIR: &str = ".store";
pub const STATE_FILE: &str = "state.json";
pub const LOG_FILE: &str = "debug.log";

// Polling
pub const CHECK_INTERVAL_MS: u64 = 60 * 60 * 1000; // hourly

// Environment keys
pub const ENV_ROOT_EVENT_ID: &str = "TICKET_WATCH_ROOT_EVENT_ID";
pub const ENV_EVENT_ID: &str = "TICKET_WATCH_EVENT_ID";
pub const ENV_PAGE_URL: &str = "TICKET_WATCH_PAGE_URL";
pub const ENV_CHECK_INTERVAL_MS: &str = "TICKET_WATCH_CHECK_INTERVAL_MS";
pub const ENV_WEBHOOK_URL: &str = "TICKET_WATCH_WEBHOOK_URL";
pub const ENV_MENTION_ID: &str = "TICKET_WATCH_MENTION_ID";
pub const ENV_STATE_PATH: &str = "TICKET_WATCH_STATE_PATH";
pub const ENV_LOG_FILE: &str = "TICKET_WATCH_LOG_FILE";
pub const ENV_CYCLE_MATCH: &str = "TICKET_WATCH_CYCLE_MATCH";
pub const ENV_SESSION: &str = "TICKET_WATCH_SESSION";
