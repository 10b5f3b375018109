//! # stackerr
//!
//! Errors that describe a failure: a message, an optional cause, and the
//! call stack captured where the error was created.
//!
//! ## Design Philosophy
//!
//! - **Error**: one described failure, optionally wrapping a prior one
//! - **Cause**: the wrapped error, described or opaque
//! - **BatchError**: several independent failures returned as one error
//! - **RenderConfig**: explicit, per-call control over trace output
//!
//! ## Usage
//!
//! ```rust
//! use stackerr::{Error, Render, RenderConfig, wrapf};
//!
//! fn open() -> stackerr::Result<()> {
//!     Err(Error::new("connection refused"))
//! }
//!
//! fn load(table: &str) -> stackerr::Result<()> {
//!     open().map_err(|err| wrapf!(err, "loading {}", table))
//! }
//!
//! let err = load("users").unwrap_err();
//! assert_eq!(err.to_string(), "loading users. connection refused");
//!
//! // Traces are only shown when asked for.
//! let verbose = format!("{:+}", err.render(&RenderConfig::verbose()));
//! assert!(verbose.starts_with("loading users. connection refused"));
//! ```
//!
//! ## Principles
//!
//! - `{}` renders the message chain `outer. middle. inner`
//! - `{:+}` adds one `func(file:line)` line per frame of the outermost error
//! - Wrapping an [`Error`] moves trace ownership to the wrapper; the inner
//!   error keeps its message and cause but no frames
//! - Rendering and capture never fail, they degrade to shorter output

mod batch;
mod cause;
mod error;
mod render;

pub use batch::{BatchError, SEPARATOR};
pub use cause::{BoxError, Cause};
pub use error::Error;
pub use render::{Json, Render, RenderConfig, RenderFormat, Rendered};
pub use stackerr_trace::{
    BacktraceReader, FixedReader, StackFrame, StackReader, StackTrace, capture,
};

/// Result type alias using stackerr Error
pub type Result<T> = std::result::Result<T, Error>;

/// Create an [`Error`] with a formatted message.
///
/// ```rust
/// let err = stackerr::errorf!("bar {} {} {}", "b", "a", "r");
/// assert_eq!(err.message(), "bar b a r");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::Error::new_fmt(::std::format_args!($($arg)+))
    };
}

/// Wrap an error in a new [`Error`] with a formatted message.
///
/// ```rust
/// let err = stackerr::wrapf!(stackerr::Error::new("e1"), "m1 {} {}", "b", "z");
/// assert_eq!(err.to_string(), "m1 b z. e1");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($cause:expr, $($arg:tt)+) => {
        $crate::Error::wrap_fmt($cause, ::std::format_args!($($arg)+))
    };
}

/// Build a [`BatchError`] from a list of errors.
///
/// ```rust
/// use stackerr::{Error, batch};
///
/// let err = batch![Error::new("e1"), Error::new("e2")];
/// assert_eq!(err.to_string(), "e1\ne2");
/// ```
#[macro_export]
macro_rules! batch {
    () => {
        $crate::BatchError::new()
    };
    ($($err:expr),+ $(,)?) => {{
        let mut batch = $crate::BatchError::new();
        $( batch.push($err); )+
        batch
    }};
}
