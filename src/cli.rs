// src/cli.rs
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::error::RunError;
use crate::fetch::HttpFetcher;
use crate::notify::WebhookNotifier;
use crate::runner::{PollController, RunOptions};
use crate::state::EventState;
use crate::store::{JsonFileStore, StateStore};

pub const HELP: &str = include_str!("cli_help.txt");

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub force: bool,
    pub status: bool,
    pub help: bool,
    pub state_path: Option<PathBuf>,
}

pub fn parse_args<I>(args: I) -> Result<Args, Box<dyn std::error::Error>>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Args::default();
    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--force" => out.force = true,
            "--status" => out.status = true,
            "--state" => out.state_path = Some(PathBuf::from(args.next().ok_or("Missing value for --state")?)),
            "-h" | "--help" => out.help = true,
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }
    Ok(out)
}

/// The single entry point: one poll, or a status print.
pub fn run(args: &Args) -> Result<(), RunError> {
    let mut config = Config::from_env()?;
    if let Some(p) = &args.state_path {
        config.state_path = p.clone();
    }
    crate::log::init(Some(config.log_file.as_path()));
    info!(
        "Watching {} (check every {} ms, new listing when release {} differs)",
        config.page_url(),
        config.check_interval_ms,
        config.cycle_match
    );

    let store = JsonFileStore::new(config.state_path.clone());
    if args.status {
        print!("{}", format_status(&store.load()?));
        return Ok(());
    }

    let fetcher = HttpFetcher::new(&config)?;
    let notifier = WebhookNotifier::new(&config)?;
    let mut controller = PollController::new(config, fetcher, store, notifier);

    let outcome = controller.run(Utc::now(), RunOptions { force_fetch: args.force })?;
    match outcome.announced {
        Some(stage) => info!("Done: sent {} message ({} fetch(es))", stage, outcome.fetches.len()),
        None => info!("Done: nothing due ({} fetch(es))", outcome.fetches.len()),
    }
    Ok(())
}

pub fn format_status(state: &EventState) -> String {
    let ts = |d: Option<chrono::DateTime<Utc>>| d.map_or_else(|| s!("-"), |d| d.to_rfc3339());
    let flags: Vec<String> = state.announcements.iter().map(|a| format!("{a:?}")).collect();
    format!(
        "release:       {}\nmeet:          {}\nsold out:      {}\nlast checked:  {}\nannounced:     {}\n",
        ts(state.release_date),
        ts(state.meet_date),
        state.sold_out,
        ts(state.last_checked_at),
        if flags.is_empty() { s!("-") } else { flags.join(", ") },
    )
}
