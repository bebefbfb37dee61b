//! HTTP client for the remote mood platform
//!
//! All calls are JSON POSTs against one configured base URL:
//! - `{base}/moods` accepts `{"moods": [...]}` and answers with
//!   `{"all_moods": "<json array>"}`, the platform's full mood list
//! - `{base}/lifestyle` accepts `{"lifestyle": [...]}`

use std::time::Duration;

use anyhow::{bail, Context};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::RemoteMood;
use crate::ports::{LifestyleEntry, MoodSyncEndpoint};

/// Response of the moods call
#[derive(Debug, Deserialize)]
struct MoodsResponse {
    #[serde(default)]
    all_moods: Option<JsonValue>,
}

/// `all_moods` is normally a string holding a JSON array; a bare array is accepted too
fn parse_all_moods(value: Option<JsonValue>) -> Result<Vec<RemoteMood>> {
    match value {
        None | Some(JsonValue::Null) => Ok(Vec::new()),
        Some(JsonValue::String(text)) if text.trim().is_empty() => Ok(Vec::new()),
        Some(JsonValue::String(text)) => Ok(serde_json::from_str(&text)?),
        Some(array @ JsonValue::Array(_)) => Ok(serde_json::from_value(array)?),
        Some(other) => Err(Error::sync(format!(
            "unexpected all_moods payload: {}",
            other
        ))),
    }
}

#[derive(Debug)]
pub struct HttpMoodSync {
    client: Client,
    moods_url: Url,
    lifestyle_url: Url,
}

impl HttpMoodSync {
    pub fn new(endpoint: &str) -> anyhow::Result<Self> {
        let mut base = Url::parse(endpoint).context("Invalid sync endpoint URL")?;
        if base.scheme() != "https" && base.scheme() != "http" {
            bail!("Sync endpoint must use http or https");
        }
        if base.host_str().is_none() {
            bail!("Sync endpoint must include a host");
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            moods_url: base.join("moods")?,
            lifestyle_url: base.join("lifestyle")?,
        })
    }

    pub fn moods_url(&self) -> &Url {
        &self.moods_url
    }

    fn post(&self, url: &Url, body: &JsonValue) -> Result<Response> {
        let response = self
            .client
            .post(url.clone())
            .header("Referer", url.as_str())
            .json(body)
            .send()
            .map_err(map_request_error)?;
        check_response_status(&response)?;
        Ok(response)
    }
}

fn map_request_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::sync("connection timed out after 30 seconds")
    } else if error.is_connect() {
        Error::sync("unable to reach the sync endpoint")
    } else {
        Error::sync(format!("request failed: {}", error))
    }
}

fn check_response_status(response: &Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::sync(format!("sync endpoint returned HTTP {}", status.as_u16())))
    }
}

impl MoodSyncEndpoint for HttpMoodSync {
    fn name(&self) -> &str {
        "http"
    }

    fn send_mood(&self, mood: &RemoteMood) -> Result<()> {
        self.post(&self.moods_url, &json!({ "moods": [mood] }))?;
        Ok(())
    }

    fn fetch_moods(&self) -> Result<Vec<RemoteMood>> {
        let response = self.post(&self.moods_url, &json!({ "moods": [] }))?;
        let body: MoodsResponse = response
            .json()
            .map_err(|e| Error::sync(format!("bad moods response: {}", e)))?;
        parse_all_moods(body.all_moods)
    }

    fn send_lifestyle(&self, entries: &[LifestyleEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        self.post(&self.lifestyle_url, &json!({ "lifestyle": entries }))?;
        Ok(())
    }
}
