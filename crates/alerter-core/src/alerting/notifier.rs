//! Sentry notification delivery

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Serialize;
use tracing::info;
use url::Url;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::MissAlert;

use super::AlertSink;

const SENTRY_VERSION: u8 = 7;
const CLIENT_NAME: &str = concat!("alerter/", env!("CARGO_PKG_VERSION"));

/// Parsed Sentry DSN: `<scheme>://<public_key>[:<secret>]@<host>[/<prefix>]/<project_id>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentryDsn {
    public_key: String,
    secret_key: Option<String>,
    store_url: Url,
}

impl SentryDsn {
    /// URL events are posted to
    pub fn store_url(&self) -> &Url {
        &self.store_url
    }

    /// Public key used to authenticate
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    fn auth_header(&self) -> String {
        let mut header = format!(
            "Sentry sentry_version={SENTRY_VERSION}, sentry_client={CLIENT_NAME}, sentry_key={}",
            self.public_key
        );
        if let Some(secret) = &self.secret_key {
            header.push_str(&format!(", sentry_secret={secret}"));
        }
        header
    }
}

impl FromStr for SentryDsn {
    type Err = Error;

    fn from_str(dsn: &str) -> Result<Self> {
        let url = Url::parse(dsn).map_err(|e| Error::config(format!("invalid DSN: {e}")))?;

        let public_key = url.username().to_string();
        if public_key.is_empty() {
            return Err(Error::config("DSN is missing the public key"));
        }
        let secret_key = url.password().map(String::from);

        let path = url.path().trim_end_matches('/');
        let (prefix, project_id) = path
            .rsplit_once('/')
            .filter(|(_, id)| !id.is_empty())
            .ok_or_else(|| Error::config("DSN is missing the project id"))?;

        let host = url
            .host_str()
            .ok_or_else(|| Error::config("DSN is missing the host"))?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let store_url = Url::parse(&format!(
            "{}://{authority}{prefix}/api/{project_id}/store/",
            url.scheme()
        ))
        .map_err(|e| Error::config(format!("invalid DSN: {e}")))?;

        Ok(Self {
            public_key,
            secret_key,
            store_url,
        })
    }
}

/// Reports alerts as Sentry events
pub struct SentryNotifier {
    client: Client,
    dsn: SentryDsn,
}

impl SentryNotifier {
    /// Create a notifier for the given DSN
    pub fn new(dsn: &str) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            dsn: dsn.parse()?,
        })
    }

    fn event(alert: &MissAlert) -> SentryEvent {
        let mut tags = BTreeMap::new();
        tags.insert("height", alert.height.to_string());
        tags.insert("time", alert.time.to_rfc3339_opts(SecondsFormat::Secs, true));
        tags.insert("address", alert.address.clone());

        SentryEvent {
            event_id: Uuid::new_v4().simple().to_string(),
            timestamp: Utc::now(),
            level: "error",
            logger: "alerter",
            platform: "other",
            message: "Missed blocks",
            tags,
            extra: serde_json::json!({
                "consecutive": alert.consecutive,
                "summary": alert.message(),
            }),
        }
    }
}

#[async_trait]
impl AlertSink for SentryNotifier {
    async fn send(&self, alert: &MissAlert) -> Result<()> {
        let event = Self::event(alert);

        let response = self
            .client
            .post(self.dsn.store_url().clone())
            .header("X-Sentry-Auth", self.dsn.auth_header())
            .json(&event)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::alert(format!("Sentry returned {status}: {body}")));
        }

        info!(
            event_id = %event.event_id,
            height = alert.height,
            address = %alert.address,
            "Sentry alert sent"
        );
        Ok(())
    }
}

// Sentry store API payload
#[derive(Debug, Serialize)]
struct SentryEvent {
    event_id: String,
    timestamp: DateTime<Utc>,
    level: &'static str,
    logger: &'static str,
    platform: &'static str,
    message: &'static str,
    tags: BTreeMap<&'static str, String>,
    extra: serde_json::Value,
}
