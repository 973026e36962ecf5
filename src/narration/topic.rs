// Topic resolution for persona posts.
//
// A topic is either free text or an http(s) URL. URLs are fetched and
// reduced to the visible text of the page body.

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::info;

/// Upper bound on topic text handed to the generator.
pub const MAX_TOPIC_CHARS: usize = 6_000;

pub fn is_url(topic: &str) -> bool {
    let topic = topic.trim();
    topic.starts_with("http://") || topic.starts_with("https://")
}

/// Return the topic content: the page text for a URL, the input otherwise.
pub async fn resolve_topic(client: &Client, topic: &str) -> Result<String> {
    let topic = topic.trim();
    if !is_url(topic) {
        return Ok(topic.to_string());
    }

    let response = client
        .get(topic)
        .send()
        .await
        .with_context(|| format!("Failed to fetch topic URL {topic}"))?;

    if !response.status().is_success() {
        anyhow::bail!("Topic URL {} returned {}", topic, response.status());
    }

    let html = response
        .text()
        .await
        .with_context(|| format!("Failed to read topic URL {topic}"))?;
    let text = extract_visible_text(&html);

    info!(url = topic, chars = text.chars().count(), "Resolved topic from URL");

    Ok(text.chars().take(MAX_TOPIC_CHARS).collect())
}

/// Collapse the text of a page's body into single-spaced prose, skipping
/// script and style contents.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body").ok();
    let skipped = ["script", "style", "noscript", "template"];

    let root = body
        .as_ref()
        .and_then(|selector| document.select(selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut words: Vec<&str> = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_skipped = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|el| skipped.contains(&el.name()))
        });
        if !inside_skipped {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}
