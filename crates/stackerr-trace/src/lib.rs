//! # stackerr-trace
//!
//! Call-stack snapshots for stackerr.
//!
//! A [`StackTrace`] is an ordered list of [`StackFrame`]s, innermost first,
//! read by a [`StackReader`]. [`BacktraceReader`] reads the real stack of the
//! calling thread; [`FixedReader`] hands back a preset trace so tests stay
//! deterministic.
//!
//! ```rust
//! use stackerr_trace::{FixedReader, StackReader};
//!
//! let reader = FixedReader::from_frames([("src/db.rs", 42, "app::db::connect")]);
//! assert_eq!(reader.read().to_string(), "app::db::connect(db.rs:42)");
//! ```
//!
//! Capture never fails. When nothing usable can be resolved (stripped
//! binaries, unsupported platforms) the trace is simply empty.

mod frame;
mod reader;

pub use frame::{StackFrame, StackTrace};
pub use reader::{BacktraceReader, DEFAULT_MAX_FRAMES, FixedReader, StackReader};

/// Capture the calling thread's stack with the default [`BacktraceReader`].
pub fn capture() -> StackTrace {
    BacktraceReader::default().read()
}
