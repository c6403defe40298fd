//! DocSage Core: configuration and shared error types.

pub mod config;
pub mod error;

pub use config::{DocSageConfig, KnowledgeBaseConfig, SegmenterKind};
pub use error::{Error, Result};
