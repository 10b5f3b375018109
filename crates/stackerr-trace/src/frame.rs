//! Frame and trace values produced by a [`StackReader`](crate::StackReader).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A single call site: where the call was made and which function made it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackFrame {
    /// Base name of the source file, directories stripped.
    pub file: String,
    /// Line in `file` where the call was made.
    pub line: u32,
    /// Demangled name of the calling function.
    pub func: String,
}

impl StackFrame {
    /// Create a frame, reducing `file` to its base name.
    pub fn new(file: impl AsRef<str>, line: u32, func: impl Into<String>) -> Self {
        Self {
            file: base_name(file.as_ref()),
            line,
            func: func.into(),
        }
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}:{})", self.func, self.file, self.line)
    }
}

fn base_name(file: &str) -> String {
    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}

/// Ordered snapshot of call sites, innermost first.
///
/// An empty trace is a valid state of its own: errors rebuilt from external
/// input, or errors whose trace moved to an outer error, carry no frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackTrace {
    frames: Vec<StackFrame>,
}

impl StackTrace {
    /// A trace with no frames.
    pub const fn empty() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn new(frames: Vec<StackFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[StackFrame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StackFrame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The innermost frame, closest to where the trace was captured.
    pub fn innermost(&self) -> Option<&StackFrame> {
        self.frames.first()
    }

    /// Move the frames out, leaving this trace empty.
    pub fn take(&mut self) -> StackTrace {
        std::mem::take(self)
    }
}

/// One `func(file:line)` line per frame, no trailing newline.
impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}

impl FromIterator<StackFrame> for StackTrace {
    fn from_iter<I: IntoIterator<Item = StackFrame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a StackTrace {
    type Item = &'a StackFrame;
    type IntoIter = std::slice::Iter<'a, StackFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl IntoIterator for StackTrace {
    type Item = StackFrame;
    type IntoIter = std::vec::IntoIter<StackFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> StackTrace {
        vec![
            StackFrame::new("/src/app/db.rs", 42, "app::db::connect"),
            StackFrame::new("main.rs", 7, "app::main"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_frame_strips_directories() {
        let frame = StackFrame::new("/home/user/project/src/lib.rs", 10, "demo::run");
        assert_eq!(frame.file, "lib.rs");

        let frame = StackFrame::new("lib.rs", 10, "demo::run");
        assert_eq!(frame.file, "lib.rs");
    }

    #[test]
    fn test_trace_display() {
        assert_eq!(
            sample().to_string(),
            "app::db::connect(db.rs:42)\napp::main(main.rs:7)"
        );
        assert_eq!(StackTrace::empty().to_string(), "");
    }

    #[test]
    fn test_take_leaves_empty() {
        let mut trace = sample();
        let moved = trace.take();
        assert!(trace.is_empty());
        assert_eq!(moved.len(), 2);
        assert_eq!(moved.innermost().map(|f| f.line), Some(42));
    }

    #[test]
    fn test_serialize_field_names() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"[{"file":"db.rs","line":42,"func":"app::db::connect"},{"file":"main.rs","line":7,"func":"app::main"}]"#
        );
    }
}
