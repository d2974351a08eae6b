use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::model::DashboardData;

/// Where the dashboard document comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Marks an error chain as a failed load so `main` can print the no-data notice.
#[derive(Debug)]
pub struct LoadFailure {
    pub source: String,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load dashboard data from {}", self.source)
    }
}

/// Fetches and parses the whole document in one attempt. Nothing is retried
/// and no partial document is ever returned.
pub fn load(source: &DataSource) -> Result<DashboardData> {
    let raw = match source {
        DataSource::File(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        DataSource::Url(url) => fetch(url),
    };

    let data = raw
        .and_then(|bytes| {
            serde_json::from_slice::<DashboardData>(&bytes)
                .with_context(|| format!("failed to parse {source}"))
        })
        .with_context(|| LoadFailure {
            source: source.to_string(),
        })?;

    info!(source = %source, chapters = data.chapters.len(), "loaded dashboard data");
    Ok(data)
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(None::<Duration>)
        .build()
        .context("failed to build http client")?;

    let response = client
        .get(url)
        .send()
        .with_context(|| format!("request to {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("{url} answered with status {status}");
    }

    let body = response
        .bytes()
        .with_context(|| format!("failed to read response body from {url}"))?;
    Ok(body.to_vec())
}
