//! Page fetching and content extraction.
//!
//! Fetch failures (network errors, non-2xx) surface as transport errors and
//! abort only the link being processed. Extraction itself never fails: if the
//! markup cannot be rendered we fall back to the raw document text.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::time::Duration;

use crate::errors::BotError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Render width for the text conversion; generous enough that the model
/// never sees mid-word wrapping artifacts.
const RENDER_WIDTH: usize = 120;

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Extracted main-body text and title of a fetched page.
#[derive(Debug)]
pub struct Page {
    pub text: String,
    pub title: Option<String>,
}

/// HTTP GET the URL and extract its content.
pub async fn fetch_page(url: &str) -> Result<Page, BotError> {
    let response = HTTP_CLIENT.get(url).send().await?;
    let response = response.error_for_status()?;
    let html = response.text().await?;

    Ok(extract_content(&html))
}

/// Convert raw HTML into plain body text plus the document title.
#[must_use]
pub fn extract_content(html: &str) -> Page {
    static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?is)<title[^>]*>(.*?)</title>")
            .unwrap_or_else(|_| Regex::new(r"$^").expect("fallback regex compiles"))
    });

    let title = TITLE_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty());

    let text = html2text::from_read(html.as_bytes(), RENDER_WIDTH)
        .unwrap_or_else(|_| html.to_string());

    Page { text, title }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_body_text() {
        let html = "<html><head><title> Example Page </title></head>\
                    <body><h1>Heading</h1><p>Some body text.</p></body></html>";
        let page = extract_content(html);
        assert_eq!(page.title.as_deref(), Some("Example Page"));
        assert!(page.text.contains("Some body text."));
    }

    #[test]
    fn missing_title_yields_none() {
        let page = extract_content("<p>no title here</p>");
        assert!(page.title.is_none());
        assert!(page.text.contains("no title here"));
    }
}
