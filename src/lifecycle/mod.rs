//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Check folder → Load config → Validate → Announce → Bind → Callback
//!
//! Shutdown (shutdown.rs):
//!     /stop or Ctrl+C → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then listener, then callback
//! - Configuration errors at startup are fatal; on reload they are not

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::StartupError;
