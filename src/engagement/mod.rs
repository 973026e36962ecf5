// Engagement metric and keyword partitioning.

pub mod calculator;
pub mod keywords;
