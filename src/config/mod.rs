//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! <folder>/config.json
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, reply/TLS files exist)
//!     → RuleDocument (compiled, immutable)
//!     → store.rs (shared via ArcSwap to all request handlers)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new document
//!     → validation.rs validates
//!     → server swaps the new Arc<RuleDocument> into the store
//! ```
//!
//! # Design Decisions
//! - A document is immutable once loaded; changes require a full reload
//! - An invalid document never replaces a valid one
//! - Validation separates syntactic (serde) from semantic checks
//! - Process settings (port, folder, limits) come from the CLI, not the document

pub mod loader;
pub mod schema;
pub mod settings;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, load_document, reload_document, ConfigError, CONFIG_FILE_NAME};
pub use schema::{HttpsConfig, MockConfig, ReplyWith, RouteConfig};
pub use settings::ServerSettings;
pub use store::ConfigStore;
pub use validation::ValidationError;
pub use watcher::ConfigWatcher;
