//! Stack readers.
//!
//! Capture is a capability handed to whoever builds an error, so tests can
//! swap the real call stack for a fixed one.

use crate::frame::{StackFrame, StackTrace};

/// Default upper bound on frames kept by [`BacktraceReader`].
pub const DEFAULT_MAX_FRAMES: usize = 32;

/// Frames belonging to the capture machinery itself, including the closure
/// shims it calls through.
const CAPTURE_PREFIXES: &[&str] = &[
    "backtrace::",
    "core::ops::function::",
    "stackerr_trace::capture",
    "stackerr_trace::reader::BacktraceReader::",
    "<stackerr_trace::reader::BacktraceReader as ",
];

/// Frames where the runtime's entry machinery begins. Everything from here
/// outward is dropped.
const RUNTIME_PREFIXES: &[&str] = &[
    "std::rt::",
    "std::panicking::",
    "std::panic::",
    "std::sys::backtrace::",
    "test::",
];

/// Reads a snapshot of the calling thread's stack.
pub trait StackReader {
    fn read(&self) -> StackTrace;
}

impl<R: StackReader + ?Sized> StackReader for &R {
    fn read(&self) -> StackTrace {
        (**self).read()
    }
}

/// Reads the real call stack through the `backtrace` crate.
#[derive(Debug, Clone)]
pub struct BacktraceReader {
    max_frames: usize,
    skip_prefixes: Vec<String>,
}

impl Default for BacktraceReader {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            skip_prefixes: Vec::new(),
        }
    }
}

impl BacktraceReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_frames` frames.
    pub fn max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Treat leading frames whose function name starts with `prefix` as part
    /// of the capture machinery.
    ///
    /// Libraries that construct errors on behalf of their callers register
    /// their constructors here so the innermost frame is the caller's.
    pub fn skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.skip_prefixes.push(prefix.into());
        self
    }

    fn is_capture_frame(&self, func: &str) -> bool {
        CAPTURE_PREFIXES.iter().any(|p| func.starts_with(p))
            || self.skip_prefixes.iter().any(|p| func.starts_with(p.as_str()))
    }
}

fn is_runtime_frame(func: &str) -> bool {
    func.contains("__rust_begin_short_backtrace")
        || RUNTIME_PREFIXES.iter().any(|p| func.starts_with(p))
}

impl StackReader for BacktraceReader {
    fn read(&self) -> StackTrace {
        let mut frames = Vec::new();
        if self.max_frames == 0 {
            return StackTrace::new(frames);
        }

        let mut in_prologue = true;
        let mut done = false;

        backtrace::trace(|raw| {
            backtrace::resolve_frame(raw, |symbol| {
                if done {
                    return;
                }
                let Some(name) = symbol.name() else {
                    return;
                };
                let func = format!("{:#}", name);

                if in_prologue && self.is_capture_frame(&func) {
                    return;
                }
                if !in_prologue && is_runtime_frame(&func) {
                    done = true;
                    return;
                }
                let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) else {
                    return;
                };

                in_prologue = false;
                frames.push(StackFrame::new(file.to_string_lossy(), line, func));
                if frames.len() >= self.max_frames {
                    done = true;
                }
            });
            !done
        });

        if frames.is_empty() {
            tracing::debug!("stack capture resolved no frames, using an empty trace");
        } else {
            tracing::trace!("captured {} stack frames", frames.len());
        }
        StackTrace::new(frames)
    }
}

/// Returns the same trace on every read.
#[derive(Debug, Clone, Default)]
pub struct FixedReader {
    trace: StackTrace,
}

impl FixedReader {
    pub fn new(trace: StackTrace) -> Self {
        Self { trace }
    }

    /// Build a reader from `(file, line, func)` triples, innermost first.
    pub fn from_frames<'a>(frames: impl IntoIterator<Item = (&'a str, u32, &'a str)>) -> Self {
        Self::new(
            frames
                .into_iter()
                .map(|(file, line, func)| StackFrame::new(file, line, func))
                .collect(),
        )
    }
}

impl StackReader for FixedReader {
    fn read(&self) -> StackTrace {
        self.trace.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_frames() {
        assert!(is_runtime_frame("std::rt::lang_start_internal"));
        assert!(is_runtime_frame(
            "std::sys::backtrace::__rust_begin_short_backtrace"
        ));
        assert!(is_runtime_frame("test::run_test_in_process"));
        assert!(!is_runtime_frame("core::ops::function::FnOnce::call_once"));
        assert!(!is_runtime_frame("app::main"));
    }

    #[test]
    fn test_capture_frames() {
        let reader = BacktraceReader::new().skip_prefix("mylib::Error::");
        assert!(reader.is_capture_frame("backtrace::backtrace::trace"));
        assert!(reader.is_capture_frame(
            "<stackerr_trace::reader::BacktraceReader as stackerr_trace::reader::StackReader>::read"
        ));
        assert!(reader.is_capture_frame("mylib::Error::new"));
        assert!(!reader.is_capture_frame("mylib::parse"));
        assert!(!reader.is_capture_frame("stackerr_trace::reader::tests::x"));
    }

    #[test]
    fn test_fixed_reader_repeats() {
        let reader = FixedReader::from_frames([("/a/b/x.rs", 3, "x::f")]);
        assert_eq!(reader.read(), reader.read());
        assert_eq!(reader.read().frames()[0].file, "x.rs");
    }

    #[test]
    fn test_zero_max_frames() {
        assert!(BacktraceReader::new().max_frames(0).read().is_empty());
    }
}
