//! Server-side rendering for the mini app page.
//!
//! The whole app is one template, compiled into the binary and rendered with [`PageData`]. Which sections appear is
//! driven by the authorization state: a verified launch gets the user card and purchase history, anything else gets
//! the landing explainer with an error banner.

use std::sync::OnceLock;

use chrono::{TimeZone, Utc};
use minijinja::Environment;
use serde::Serialize;
use tonplace_tools::Purchase;
use tpa_common::{Currency, Money};

use crate::{data_objects::LaunchUser, errors::ServerError};

static TEMPLATES: OnceLock<Environment<'static>> = OnceLock::new();

fn templates() -> &'static Environment<'static> {
    TEMPLATES.get_or_init(|| {
        let mut env = Environment::new();
        env.add_template("index.html", include_str!("../templates/index.html"))
            .expect("The embedded index template must parse");
        env.add_filter("amount", amount);
        env.add_filter("datetime", datetime);
        env
    })
}

/// Formats a raw purchase amount for display. Amounts arrive in the smallest unit of their currency; unrecognised
/// currency codes are formatted as euros, matching the platform default.
fn amount(value: i64, currency: String) -> String {
    let currency = currency.parse::<Currency>().unwrap_or(Currency::Eur);
    Money::new(value, currency).to_string()
}

/// Formats a unix timestamp as a human-readable UTC date.
fn datetime(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

/// Everything the index template needs to render.
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub user: LaunchUser,
    pub transactions: Vec<Purchase>,
    pub error: Option<String>,
    pub is_authorized: bool,
}

impl PageData {
    /// Page data for a verified launch.
    pub fn authorized(user: LaunchUser, transactions: Vec<Purchase>) -> Self {
        Self { user, transactions, error: None, is_authorized: true }
    }

    /// Page data for a launch that was missing its parameters or failed verification. The page shows the landing
    /// explainer with the given message in the error banner.
    pub fn unauthorized(user: LaunchUser, error: impl Into<String>) -> Self {
        Self { user, transactions: Vec::new(), error: Some(error.into()), is_authorized: false }
    }
}

/// Renders the index page.
pub fn render_index(data: &PageData) -> Result<String, ServerError> {
    let template = templates().get_template("index.html").map_err(|e| ServerError::RenderError(e.to_string()))?;
    template.render(data).map_err(|e| ServerError::RenderError(e.to_string()))
}
