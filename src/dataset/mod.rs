// Post records and input loading.

pub mod loader;
pub mod models;
