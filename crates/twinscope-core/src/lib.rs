pub mod config;
pub mod error;
pub mod models;
pub mod search_dsl;
pub mod storage;

pub use config::{AppConfig, DedupConfig, MarkerStyle};
pub use error::{CoreError, Result};
pub use models::*;

pub use search_dsl::SearchQuery;

pub use storage::library::CardLibrary;
pub use storage::lock::LibraryLock;
pub use storage::source::{ItemSource, MutationSink, ScopeSelector};
