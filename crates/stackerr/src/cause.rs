//! The value an [`Error`] wraps, and the members of a [`BatchError`](crate::BatchError).

use crate::Error;
use crate::render::{Render, RenderConfig};
use stackerr_trace::StackTrace;
use std::error::Error as StdError;
use std::fmt;

static NO_TRACE: StackTrace = StackTrace::empty();

/// Boxed error accepted as an opaque cause.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A wrapped error.
///
/// Anything implementing [`std::error::Error`] can be a cause. Errors from
/// this crate keep their message, cause and trace; everything else is kept
/// as-is and only contributes its text.
#[derive(Debug)]
pub enum Cause {
    Described(Box<Error>),
    Opaque(BoxError),
}

impl Cause {
    /// Adapt a boxed error, recovering an [`Error`] if that is what it holds.
    pub fn from_boxed(err: BoxError) -> Self {
        match err.downcast::<Error>() {
            Ok(described) => Cause::Described(described),
            Err(opaque) => Cause::Opaque(opaque),
        }
    }

    /// The cause's own message. For opaque errors this is their display text.
    pub fn message(&self) -> String {
        match self {
            Cause::Described(err) => err.message().to_string(),
            Cause::Opaque(err) => err.to_string(),
        }
    }

    /// The cause's trace; always empty for opaque errors.
    pub fn stack(&self) -> &StackTrace {
        match self {
            Cause::Described(err) => err.stack(),
            Cause::Opaque(_) => &NO_TRACE,
        }
    }

    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Cause::Described(err) => Some(&**err),
            Cause::Opaque(_) => None,
        }
    }

    pub fn as_error_mut(&mut self) -> Option<&mut Error> {
        match self {
            Cause::Described(err) => Some(&mut **err),
            Cause::Opaque(_) => None,
        }
    }

    /// View the cause as a standard error, e.g. to downcast an opaque one.
    pub fn as_dyn(&self) -> &(dyn StdError + 'static) {
        match self {
            Cause::Described(err) => &**err,
            Cause::Opaque(err) => &**err,
        }
    }

    pub fn is_described(&self) -> bool {
        matches!(self, Cause::Described(_))
    }
}

impl<E> From<E> for Cause
where
    E: StdError + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Cause::from_boxed(Box::new(err))
    }
}

/// Plain rendering of the cause.
impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Described(err) => write!(f, "{}", err),
            Cause::Opaque(err) => write!(f, "{}", err),
        }
    }
}

impl Render for Cause {
    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Described(err) => err.write_plain(f),
            Cause::Opaque(err) => write!(f, "{}", err),
        }
    }

    fn write_verbose(&self, f: &mut fmt::Formatter<'_>, config: &RenderConfig) -> fmt::Result {
        match self {
            Cause::Described(err) => err.write_verbose(f, config),
            Cause::Opaque(err) => write!(f, "{}", err),
        }
    }

    fn to_json(&self, config: &RenderConfig) -> serde_json::Value {
        match self {
            Cause::Described(err) => err.to_json(config),
            Cause::Opaque(err) => serde_json::json!({
                "message": err.to_string(),
                "stack": [],
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackerr_trace::FixedReader;

    #[test]
    fn test_described_is_recovered() {
        let reader = FixedReader::from_frames([("a.rs", 1, "a::f")]);
        let cause = Cause::from(Error::new_with(&reader, "boom"));
        assert!(cause.is_described());
        assert_eq!(cause.message(), "boom");
        assert_eq!(cause.stack().len(), 1);
    }

    #[test]
    fn test_recovered_from_box() {
        let boxed: BoxError = Box::new(Error::new("boxed"));
        let cause = Cause::from_boxed(boxed);
        assert_eq!(cause.as_error().map(|e| e.message()), Some("boxed"));
    }

    #[test]
    fn test_opaque_keeps_text() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "unexpected EOF");
        let cause = Cause::from(io);
        assert!(!cause.is_described());
        assert_eq!(cause.message(), "unexpected EOF");
        assert_eq!(cause.to_string(), "unexpected EOF");
        assert!(cause.stack().is_empty());
        assert!(cause.as_dyn().downcast_ref::<std::io::Error>().is_some());
        assert_eq!(
            cause.to_json(&RenderConfig::verbose()).to_string(),
            r#"{"message":"unexpected EOF","stack":[]}"#
        );
    }
}
