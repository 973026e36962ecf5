// Narration: turns engine output into prompts and prose.
//
// Everything here consumes finished analytics (a ranked Dataset or a
// KeywordReport). Nothing in the engine calls back into this module.

use anyhow::Result;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::traits::{GenerationRequest, TextGenerator};
use crate::analysis::KeywordReport;
use crate::dataset::models::Dataset;

pub const DEFAULT_INSTRUCTIONS: &str = "You are a helpful social media analyst.";

/// A generated post in the voice of the dataset's author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonaPost {
    pub screen_name: String,
    pub text: String,
}

/// The top `n` posts as `{text, engagement}` records for a prompt.
pub fn top_posts_json(dataset: &Dataset, n: usize) -> String {
    let rows: Vec<_> = dataset
        .top(n)
        .iter()
        .map(|p| json!({ "text": p.text, "engagement": p.engagement }))
        .collect();
    serde_json::Value::Array(rows).to_string()
}

pub fn engagement_summary_prompt(dataset: &Dataset, n: usize) -> String {
    format!(
        "Analyze the following posts based on their text and engagement \
         (favorites per view), and summarize what drives engagement:\n\n{}\n\n\
         Provide your analysis:",
        top_posts_json(dataset, n)
    )
}

pub fn keyword_summary_prompt(report: &KeywordReport, alpha: f64) -> String {
    let rows: Vec<_> = report
        .results
        .iter()
        .map(|r| {
            json!({
                "keyword": r.keyword,
                "engagement_with_keyword": r.engagement_true,
                "engagement_without_keyword": r.engagement_false,
                "posts_with_keyword": r.count_true,
                "posts_without_keyword": r.count_false,
                "fdr_adjusted_pvalue": r.corrected_pvalue,
                "error": r.error.as_ref().map(|e| e.kind.as_str()),
            })
        })
        .collect();
    format!(
        "The table below compares mean post engagement with and without each \
         keyword. P-values are Benjamini-Hochberg adjusted; treat values at or \
         below {alpha} as significant and say plainly when a keyword could not \
         be tested.\n\n{}\n\nSummarize which keywords help or hurt engagement:",
        serde_json::Value::Array(rows)
    )
}

pub fn persona_prompt(dataset: &Dataset, n: usize, analysis: &str, topic_content: &str) -> String {
    format!(
        "You are emulating a social media persona. Based on the following analysis \
         of post engagement: {analysis}\n\n\
         Here are some example posts and their engagement: {}\n\n\
         Create an engaging post about the following topic or content:\n\n\
         {topic_content}\n\nPost:",
        top_posts_json(dataset, n)
    )
}

/// Ask the generator what drives engagement in the top `n` posts.
pub async fn summarize_engagement(
    generator: &dyn TextGenerator,
    dataset: &Dataset,
    n: usize,
) -> Result<String> {
    if dataset.is_empty() {
        anyhow::bail!("No posts to analyze, cannot summarize engagement");
    }
    info!(posts = dataset.top(n).len(), "Requesting engagement summary");
    let request = GenerationRequest::new(DEFAULT_INSTRUCTIONS, engagement_summary_prompt(dataset, n));
    generator.generate(&request).await
}

/// Ask the generator to explain a keyword report in prose.
pub async fn summarize_keywords(
    generator: &dyn TextGenerator,
    report: &KeywordReport,
    alpha: f64,
) -> Result<String> {
    info!(keywords = report.results.len(), "Requesting keyword summary");
    let request = GenerationRequest::new(DEFAULT_INSTRUCTIONS, keyword_summary_prompt(report, alpha));
    generator.generate(&request).await
}

/// Write a new post about `topic_content` in the style of the dataset.
pub async fn persona_post(
    generator: &dyn TextGenerator,
    dataset: &Dataset,
    n: usize,
    analysis: &str,
    topic_content: &str,
    screen_name: &str,
) -> Result<PersonaPost> {
    if topic_content.trim().is_empty() {
        anyhow::bail!("Topic is empty, nothing to write about");
    }
    let request = GenerationRequest::new(
        DEFAULT_INSTRUCTIONS,
        persona_prompt(dataset, n, analysis, topic_content),
    );
    let text = generator.generate(&request).await?;
    Ok(PersonaPost {
        screen_name: screen_name.to_string(),
        text,
    })
}
