//! PageSpeed Insights API: request building, response decoding and the
//! retrying client.

mod client;
mod request;
mod response;

pub use client::PageSpeedClient;
pub use request::{build_request_url, redact_key, Category, RequestConfig, Strategy, StrategyChoice};
pub use response::{Audit, CategoryResult, LighthouseResult, PageSpeedResponse, RuntimeError};
