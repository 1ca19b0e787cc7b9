// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Slack incoming-webhook delivery
//!
//! A message is a JSON object `{"text": "..."}` POSTed with
//! `Content-Type: application/json`. Any non-2xx response is a failure and
//! is never retried.

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Webhook delivery errors
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request could not be sent or the response not read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook answered with a non-success status
    #[error("Webhook responded with HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as returned by the service
        body: String,
    },

    /// The webhook URL is unusable
    #[error("Invalid webhook URL: {0}")]
    InvalidUrl(String),

    /// No webhook was configured for this run
    #[error("No webhook configured")]
    NotConfigured,
}

/// Something that can relay a text message into a channel
pub trait Messenger {
    /// Deliver one message
    ///
    /// # Errors
    ///
    /// Returns `WebhookError` if the message was not accepted.
    fn post(&self, text: &str) -> Result<(), WebhookError>;
}

impl<M: Messenger + ?Sized> Messenger for &M {
    fn post(&self, text: &str) -> Result<(), WebhookError> {
        (**self).post(text)
    }
}

impl<M: Messenger> Messenger for Option<M> {
    fn post(&self, text: &str) -> Result<(), WebhookError> {
        match self {
            Some(messenger) => messenger.post(text),
            None => Err(WebhookError::NotConfigured),
        }
    }
}

/// JSON payload accepted by Slack incoming webhooks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackMessage<'a> {
    /// Message text, Slack `mrkdwn` formatted
    pub text: &'a str,
}

/// Blocking client for one Slack incoming webhook
pub struct SlackWebhook {
    client: Client,
    url: Url,
}

impl SlackWebhook {
    /// Create a client for the webhook at `url`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidUrl` if the URL does not parse, or
    /// `WebhookError::Transport` if the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, WebhookError> {
        let url = Url::parse(url).map_err(|e| WebhookError::InvalidUrl(e.to_string()))?;
        let client = Client::builder()
            .user_agent(concat!("commit-notify/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, url })
    }

    /// Host the webhook posts to; the full URL carries a secret
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("<unknown>")
    }
}

impl Messenger for SlackWebhook {
    fn post(&self, text: &str) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&SlackMessage { text })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(host = self.host(), status = status.as_u16(), "Webhook accepted message");
        Ok(())
    }
}
