use serde_json::Value;
use url::Url;

/// Google search results wrap the real destination in a redirect URL whose
/// `url` query parameter carries the target.
const GOOGLE_REDIRECT_PREFIX: &str = "https://www.google.com/url?";

/// Rewrite a known search-engine redirect URL to its true destination.
///
/// Pure string transform, no network access. Anything that is not a
/// recognized redirector - including malformed query strings or a missing
/// `url` parameter - comes back unchanged.
#[must_use]
pub fn resolve_redirect(url: &str) -> String {
    if !url.starts_with(GOOGLE_REDIRECT_PREFIX) {
        return url.to_string();
    }

    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| url.to_string())
}

/// Collect every hyperlink from a message's rich-text block tree.
///
/// Slack nests links two levels down: `blocks -> elements -> elements`, with
/// link entries carrying `"type": "link"` and a `url` field. We don't attempt
/// to fully model the block schema; unexpected shapes are simply skipped.
#[must_use]
pub fn extract_links_from_blocks(blocks: &[Value]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for block in blocks {
        let Some(elements) = block.get("elements").and_then(Value::as_array) else {
            continue;
        };
        for element in elements {
            let Some(items) = element.get("elements").and_then(Value::as_array) else {
                continue;
            };
            for item in items {
                if item.get("type").and_then(Value::as_str) == Some("link")
                    && let Some(link) = item.get("url").and_then(Value::as_str)
                {
                    out.push(link.to_string());
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_google_redirect_to_target() {
        let url = "https://www.google.com/url?url=https%3A%2F%2Fexample.com%2Fpage&sa=t";
        assert_eq!(resolve_redirect(url), "https://example.com/page");
    }

    #[test]
    fn leaves_other_hosts_unchanged() {
        let url = "https://example.com/url?url=https%3A%2F%2Felsewhere.net";
        assert_eq!(resolve_redirect(url), url);
    }

    #[test]
    fn missing_url_parameter_falls_back_to_input() {
        let url = "https://www.google.com/url?q=something&sa=t";
        assert_eq!(resolve_redirect(url), url);
    }

    #[test]
    fn extracts_links_from_rich_text_blocks() {
        let blocks = vec![json!({
            "type": "rich_text",
            "elements": [{
                "type": "rich_text_section",
                "elements": [
                    {"type": "text", "text": "check out "},
                    {"type": "link", "url": "https://example.com/a"},
                    {"type": "text", "text": " and "},
                    {"type": "link", "url": "https://example.com/b"}
                ]
            }]
        })];

        assert_eq!(
            extract_links_from_blocks(&blocks),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn ignores_blocks_without_nested_elements() {
        let blocks = vec![
            json!({"type": "section", "text": {"type": "mrkdwn", "text": "hi"}}),
            json!({"type": "rich_text", "elements": [{"type": "rich_text_section"}]}),
        ];
        assert!(extract_links_from_blocks(&blocks).is_empty());
    }
}
