use stackerr_trace::{BacktraceReader, StackReader, capture};

#[inline(never)]
fn capture_here() -> stackerr_trace::StackTrace {
    capture()
}

#[test]
fn innermost_frame_is_the_caller() {
    let trace = capture_here();
    assert!(!trace.is_empty(), "expected frames from a debug build");

    let innermost = trace.innermost().unwrap();
    assert!(
        innermost.func.ends_with("capture_here"),
        "unexpected innermost frame {innermost}"
    );
    assert_eq!(innermost.file, "capture.rs");
}

#[test]
fn capture_machinery_is_trimmed() {
    let trace = capture();
    for frame in &trace {
        assert!(!frame.func.starts_with("backtrace::"), "{frame}");
        assert!(!frame.func.starts_with("stackerr_trace::capture"), "{frame}");
        assert!(!frame.file.contains('/'), "{frame}");
        assert!(!frame.file.contains('\\'), "{frame}");
    }
}

#[test]
fn runtime_entry_is_trimmed() {
    let trace = capture();
    for frame in &trace {
        assert!(!frame.func.starts_with("std::rt::"), "{frame}");
        assert!(!frame.func.contains("__rust_begin_short_backtrace"), "{frame}");
        assert!(!frame.func.starts_with("test::"), "{frame}");
    }
}

#[test]
fn max_frames_bounds_the_trace() {
    fn recurse(depth: usize, reader: &BacktraceReader) -> stackerr_trace::StackTrace {
        if depth == 0 {
            reader.read()
        } else {
            recurse(depth - 1, reader)
        }
    }

    let reader = BacktraceReader::new().max_frames(3);
    assert!(recurse(10, &reader).len() <= 3);
}
