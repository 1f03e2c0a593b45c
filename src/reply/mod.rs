//! Reply subsystem.
//!
//! # Data Flow
//! ```text
//! matched Rule
//!     → sequencer.rs (take the rule's turn, pick file)
//!     → assembler.rs (read file, status, content type)
//!     → sequencer.rs (advance hit counter once the file was read)
//!     → Reply handed back to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Hit counters belong to the compiled rule, not to a global table
//! - Reply files are read on every request, never cached
//! - A failed read does not consume a sequence entry
//! - Content type comes from the file extension only

pub mod assembler;
pub mod sequencer;

pub use assembler::{assemble, Reply, ReplyError};
pub use sequencer::{ReplySequence, ReplySource, ReplyTurn};
