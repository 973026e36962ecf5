// Resonance: keyword engagement analytics for social media posts
//
// This is the library root. The engine (dataset, engagement, stats,
// analysis) is synchronous and pure; narration and output sit downstream
// of it and are only used by the CLI.

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod engagement;
pub mod error;
pub mod narration;
pub mod output;
pub mod stats;

pub use analysis::compute_keyword_engagement;
pub use engagement::calculator::compute_engagement;
