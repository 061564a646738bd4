// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific readers. Each spec knows *where the facts live in the markup*
//! of one page and how to pull them out tolerantly.
//!
//! ## What lives here
//! - **Pure parsing** of fetched pages into small typed snapshots.
//! - **Pattern choice & precedence** (which of several layouts wins).
//!
//! ## What does **not** live here
//! - Fetching (`fetch`), persistence (`store`), or deciding what a snapshot
//!   means for the tracked event (`state`, `runner`).
//!
//! ## Conventions
//! - Case-insensitive matching; tolerate whitespace, entities and tag noise.
//! - Every failure is a typed [`crate::error::ParseError`] carrying the raw page,
//!   so a layout change is distinguishable from everything else.
//! - Specs are testable **offline** against inline fixtures.
pub mod event_page;

pub use event_page::Snapshot;
