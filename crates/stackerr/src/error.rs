//! The described error type.

use crate::cause::Cause;
use crate::render::{Render, RenderConfig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use stackerr_trace::{BacktraceReader, StackReader, StackTrace};
use std::error::Error as StdError;
use std::fmt;

/// An error with a message, an optional cause and the stack that created it.
pub struct Error {
    message: String,
    cause: Option<Cause>,
    trace: StackTrace,
}

/// Reader that trims this type's constructors from captured traces.
fn default_reader() -> BacktraceReader {
    BacktraceReader::new()
        .skip_prefix("stackerr::error::Error::")
        .skip_prefix("<stackerr::error::Error as ")
}

impl Error {
    /// Create a new error and capture the caller's stack.
    pub fn new(message: impl Into<String>) -> Self {
        Self::new_with(&default_reader(), message)
    }

    /// Create a new error from preformatted arguments. See [`errorf!`](crate::errorf).
    pub fn new_fmt(args: fmt::Arguments<'_>) -> Self {
        Self::new_with(&default_reader(), fmt::format(args))
    }

    /// Create a new error, reading the stack through `reader`.
    pub fn new_with<R>(reader: &R, message: impl Into<String>) -> Self
    where
        R: StackReader + ?Sized,
    {
        let message = message.into();
        debug_assert!(!message.is_empty(), "error message must not be empty");
        Self {
            message,
            cause: None,
            trace: reader.read(),
        }
    }

    /// Wrap `cause` in a new error and capture the caller's stack.
    ///
    /// If `cause` is itself an [`Error`], its trace is discarded: the new
    /// error's trace covers the same call path.
    pub fn wrap(cause: impl Into<Cause>, message: impl Into<String>) -> Self {
        Self::wrap_with(&default_reader(), cause, message)
    }

    /// Wrap `cause` with a message built from preformatted arguments. See
    /// [`wrapf!`](crate::wrapf).
    pub fn wrap_fmt(cause: impl Into<Cause>, args: fmt::Arguments<'_>) -> Self {
        Self::wrap_with(&default_reader(), cause, fmt::format(args))
    }

    /// Wrap `cause`, reading the stack through `reader`.
    pub fn wrap_with<R>(reader: &R, cause: impl Into<Cause>, message: impl Into<String>) -> Self
    where
        R: StackReader + ?Sized,
    {
        let message = message.into();
        debug_assert!(!message.is_empty(), "error message must not be empty");

        let mut cause = cause.into();
        if let Some(inner) = cause.as_error_mut() {
            let dropped = inner.trace.take();
            if !dropped.is_empty() {
                tracing::trace!(
                    "dropping {} frames of '{}', superseded by the wrapping error",
                    dropped.len(),
                    inner.message
                );
            }
        }

        Self {
            message,
            cause: Some(cause),
            trace: reader.read(),
        }
    }

    /// Create an error without capturing a stack, e.g. when rebuilding one
    /// from external input.
    pub fn detached(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            trace: StackTrace::empty(),
        }
    }

    /// Get the error message, without the cause chain.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the wrapped error, if any.
    pub fn inner(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Get the wrapped error when it is itself an [`Error`].
    pub fn inner_error(&self) -> Option<&Error> {
        self.cause.as_ref().and_then(Cause::as_error)
    }

    /// Get the stack captured when this error was created.
    ///
    /// Empty once the error has been wrapped by another one.
    pub fn stack(&self) -> &StackTrace {
        &self.trace
    }

    /// Iterate over the cause chain, outermost cause first.
    pub fn causes(&self) -> impl Iterator<Item = &Cause> + '_ {
        std::iter::successors(self.cause.as_ref(), |cause| {
            cause.as_error().and_then(|err| err.cause.as_ref())
        })
    }
}

impl Render for Error {
    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, ". {}", cause)?;
        }
        Ok(())
    }

    fn write_verbose(&self, f: &mut fmt::Formatter<'_>, config: &RenderConfig) -> fmt::Result {
        self.write_plain(f)?;
        if config.include_trace && !self.trace.is_empty() {
            write!(f, "\n{}", self.trace)?;
        }
        Ok(())
    }

    fn to_json(&self, config: &RenderConfig) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert("message".into(), self.message.clone().into());
        if let Some(cause) = &self.cause {
            object.insert("inner".into(), cause.to_string().into());
        }
        let frames = if config.include_trace {
            self.trace
                .iter()
                .map(|frame| {
                    serde_json::json!({
                        "file": frame.file,
                        "line": frame.line,
                        "func": frame.func,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };
        object.insert("stack".into(), serde_json::Value::Array(frames));
        serde_json::Value::Object(object)
    }
}

/// `{}` renders the message chain. `{:+}` appends the stack trace.
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.sign_plus() {
            self.write_verbose(f, &RenderConfig::verbose())
        } else {
            self.write_plain(f)
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;

        if let Some(cause) = &self.cause {
            writeln!(f)?;
            writeln!(f, "    Caused by: {}", cause)?;
        }

        if !self.trace.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Stack:")?;
            for frame in &self.trace {
                writeln!(f, "        {}", frame)?;
            }
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(Cause::as_dyn)
    }
}

/// Serializes the structured form with the default [`RenderConfig`], so the
/// `stack` array is empty. Use [`Render::json`] to include traces.
impl Serialize for Error {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json(&RenderConfig::default()).serialize(serializer)
    }
}

#[derive(Deserialize)]
struct ErrorRepr {
    message: String,
    #[serde(default)]
    inner: Option<String>,
}

/// Rebuilds an error from its structured form. The cause comes back as a
/// single error holding the cause chain's text, and no traces are restored.
impl<'de> Deserialize<'de> for Error {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = ErrorRepr::deserialize(deserializer)?;
        let mut err = Error::detached(repr.message);
        err.cause = repr
            .inner
            .map(|text| Cause::Described(Box::new(Error::detached(text))));
        Ok(err)
    }
}
