// src/lib.rs

#[macro_use]
pub mod macros;

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod fetch;
pub mod log;
pub mod notify;
pub mod runner;
pub mod specs;
pub mod state;
pub mod store;

pub use runner::{PollController, RunOptions, RunOutcome};
pub use state::{Announcement, EventState, Stage};
