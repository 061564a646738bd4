// src/notify.rs
//! Outbound chat messages, one template per lifecycle stage.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::net;
use crate::error::NotifyError;
use crate::state::{EventState, Stage};

pub trait Notifier {
    fn send(&mut self, stage: Stage, state: &EventState) -> Result<(), NotifyError>;
}

impl<T: Notifier + ?Sized> Notifier for &mut T {
    fn send(&mut self, stage: Stage, state: &EventState) -> Result<(), NotifyError> {
        (**self).send(stage, state)
    }
}

/// Values the templates need besides the event state.
#[derive(Clone, Debug, Default)]
pub struct MessageContext {
    pub mention_id: String,
    pub page_url: String,
}

impl MessageContext {
    pub fn from_config(config: &Config) -> Self {
        Self { mention_id: config.mention_id.clone(), page_url: config.page_url() }
    }

    fn mention(&self) -> String {
        if self.mention_id.is_empty() { s!() } else { format!("<@{}> ", self.mention_id) }
    }
}

fn long_date(dt: Option<DateTime<Utc>>) -> String {
    dt.map_or_else(|| s!("(date unknown)"), |d| d.format("%A %-d %B %Y").to_string())
}

fn long_time(dt: Option<DateTime<Utc>>) -> String {
    match dt {
        // <t:..:R> renders as "in 3 hours" in the chat client
        Some(d) => format!("{} UTC (<t:{}:R>)", d.format("%A %-d %B %Y %H:%M"), d.timestamp()),
        None => s!("(time unknown)"),
    }
}

pub fn render(stage: Stage, state: &EventState, ctx: &MessageContext) -> String {
    let body = match stage {
        Stage::NextDate => format!(
            "Next meet announced for {}! Tickets go on sale {}.",
            long_date(state.meet_date),
            long_time(state.release_date),
        ),
        Stage::OnSale => format!(
            "Tickets for {} are on sale now: {}",
            long_date(state.meet_date),
            ctx.page_url,
        ),
        Stage::SoldOut => format!(
            "Tickets for {} are sold out. {}",
            long_date(state.meet_date),
            ctx.page_url,
        ),
    };
    join!(&ctx.mention(), &body)
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    content: &'a str,
}

/// Posts `{"content": ...}` to a chat webhook.
pub struct WebhookNotifier {
    client: Client,
    target: String,
    ctx: MessageContext,
}

impl WebhookNotifier {
    pub fn new(config: &Config) -> Result<Self, NotifyError> {
        Ok(Self {
            client: net::client()?,
            target: config.notify_target.clone(),
            ctx: MessageContext::from_config(config),
        })
    }
}

impl Notifier for WebhookNotifier {
    fn send(&mut self, stage: Stage, state: &EventState) -> Result<(), NotifyError> {
        if self.target.is_empty() {
            return Err(NotifyError::MissingTarget);
        }
        let content = render(stage, state, &self.ctx);
        debug!("Posting {} message: {}", stage, content);

        let resp = self.client.post(&self.target).json(&WebhookMessage { content: &content }).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(NotifyError::Rejected { status: status.as_u16(), body });
        }

        info!("Webhook accepted {} message ({})", stage, status);
        Ok(())
    }
}
