pub mod api;
pub mod client;

pub use api::ApiClient;
pub use client::{ChatClient, PollIntervals};
