//! Batch analysis of web pages with the PageSpeed Insights API.
//!
//! URLs are normalized and checked, optionally probed for HTML, sent to the
//! API in paced concurrent windows with retry, and reshaped into
//! [`format::AnalysisResult`] records. [`operations`] ties it together.

pub mod analyzer;
pub mod api;
pub mod compare;
pub mod config;
pub mod content_check;
pub mod error;
pub mod format;
pub mod http;
pub mod logging;
pub mod operations;
pub mod retry;
pub mod scheduler;
pub mod sitemap;
pub mod url_model;

pub use error::{ErrorType, PsiError};
