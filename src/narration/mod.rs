// Narration: prose summaries and persona posts from analytics output.
//
// The TextGenerator trait is the only way out to a remote service. This
// module depends on the analytics types; the analytics never depend on it.

pub mod narrator;
pub mod openai;
pub mod rate_limiter;
pub mod topic;
pub mod traits;
