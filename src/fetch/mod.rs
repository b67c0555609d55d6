//! Network retrieval for Hiring-Radar
//!
//! One request at a time per caller, with retry/backoff and a courtesy
//! pause after every success.

mod fetcher;
mod retry;

pub use fetcher::{build_http_client, ClientIdentity, FetchKind, FetchedPage, Fetcher, Politeness};
pub use retry::{retry_with_backoff, RetryFailure, RetryPolicy};
