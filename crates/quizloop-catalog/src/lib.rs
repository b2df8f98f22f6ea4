//! quizloop-catalog: where quizzes come from.
//!
//! Implements the `QuizCatalog` trait for a local directory and for a folder
//! served over HTTP, plus the `quizloop.toml` configuration that selects one.

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod listing;
pub mod local;

pub use catalog::{load_quiz, CatalogEntry, QuizCatalog};
pub use config::{create_catalog, load_config, load_config_from, CatalogConfig, QuizloopConfig};
pub use error::CatalogError;
pub use http::HttpCatalog;
pub use local::LocalCatalog;
