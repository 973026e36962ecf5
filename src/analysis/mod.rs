// Keyword engagement analysis: the pipeline and its result table.

pub mod pipeline;
pub mod report;

pub use pipeline::compute_keyword_engagement;
pub use report::{KeywordReport, KeywordResult};
