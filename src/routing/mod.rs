//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path?query)
//!     → router.rs (rule lookup in document order)
//!     → matcher.rs (evaluate pattern, then method)
//!     → Return: matched Rule or None
//!
//! Rule Compilation (at load/reload):
//!     RouteConfig[]
//!     → Compile regex and method matchers
//!     → Resolve reply files against the config folder
//!     → Freeze as immutable RuleDocument
//! ```
//!
//! # Design Decisions
//! - Rules compiled at load time, immutable at runtime
//! - Deterministic: same input always matches same rule
//! - First match wins (document order)

pub mod matcher;
pub mod router;

pub use router::{Rule, RuleDocument};
