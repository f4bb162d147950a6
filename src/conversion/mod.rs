//! Conversion pipeline
//!
//! This module contains the orchestrator, its configuration, the output cache,
//! input limits and directory conversion.

pub mod batch;
pub mod cache;
pub mod config;
pub mod engine;
pub mod limits;

pub use batch::{convert_directory, BatchOptions, BatchReport};
pub use cache::{CachePolicy, CacheStats, ConversionCache, Fingerprint};
pub use config::{ConversionConfig, DelimiterType};
pub use engine::{convert_text, Conversion, ConversionRequest, Converter};

pub use crate::error::ConversionResult;
