//! Page title fetching
//!
//! Fetches a page with a single blocking GET and returns the text of its
//! first `<title>` element.

use std::time::Duration;

use reqwest::StatusCode;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors from fetching a page title
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request could not be sent or the body not read
    #[error("Unable to fetch web page '{url}': {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Unable to fetch web page '{url}': HTTP {status}")]
    Status { url: String, status: StatusCode },

    /// The page has no `<title>` element
    #[error("Unable to find title tag in '{url}'")]
    TitleNotFound { url: String },
}

/// Fetch the title of the page at `url`
pub fn fetch_title(url: &Url, timeout: Duration) -> Result<String, FetchError> {
    let request_error = |source: reqwest::Error| FetchError::Request {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("linkman/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(request_error)?;

    debug!("Fetching title for {}", url);
    let response = client.get(url.clone()).send().map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let html = response.text().map_err(request_error)?;
    parse_title(&html).ok_or_else(|| FetchError::TitleNotFound {
        url: url.to_string(),
    })
}

/// Extract the first `<title>` element's text from HTML
fn parse_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}
