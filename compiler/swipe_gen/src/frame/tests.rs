use pretty_assertions::assert_eq;

use std::io;

use super::{frame, frame_and_format, stdin_result, FileKind, FrameError, Formatter, Passthrough};
use crate::importer::Importer;

struct Rejecting;

impl Formatter for Rejecting {
    fn format(&self, _src: &[u8]) -> Result<Vec<u8>, String> {
        Err("1:1: expected 'package'".into())
    }
}

#[test]
fn go_files_get_header_package_and_imports() {
    let mut importer = Importer::new("example.com/app");
    importer.import("http", "net/http");
    importer.import("", "github.com/go-kit/kit/endpoint");
    let out = frame("endpoint.go", "app", "1.2.3", &importer, b"var _ = 1\n");
    assert_eq!(
        String::from_utf8_lossy(&out),
        "// Code generated by Swipe v1.2.3. DO NOT EDIT.\n\n\
         //go:build !swipe\n\n\
         package app\n\n\
         import (\n\
         \t\"github.com/go-kit/kit/endpoint\"\n\
         \t\"net/http\"\n\
         )\n\n\
         var _ = 1\n"
    );
}

#[test]
fn go_files_without_imports_skip_the_block() {
    let out = frame("x.go", "app", "1.0.0", &Importer::new("example.com/app"), b"");
    assert_eq!(
        String::from_utf8_lossy(&out),
        "// Code generated by Swipe v1.0.0. DO NOT EDIT.\n\n//go:build !swipe\n\npackage app\n\n"
    );
}

#[test]
fn js_and_other_files() {
    let importer = Importer::new("example.com/app");
    let js = frame("client.js", "app", "1.0.0", &importer, b"export default {};\n");
    assert!(String::from_utf8_lossy(&js).starts_with("// Code generated by Swipe v1.0.0"));
    let json = frame("openapi.json", "app", "1.0.0", &importer, b"{}");
    assert_eq!(json, b"{}".to_vec());
    assert_eq!(FileKind::of("a.md"), FileKind::Raw);
}

#[test]
fn formatter_errors_carry_the_unformatted_source() {
    let importer = Importer::new("example.com/app");
    let err = frame_and_format("x.go", "app", "1.0.0", &importer, b"func(", &Rejecting).err();
    let Some(FrameError::Format {
        filename,
        message,
        unformatted,
    }) = err
    else {
        panic!("expected a format error");
    };
    assert_eq!(filename, "x.go");
    assert_eq!(message, "1:1: expected 'package'");
    assert!(unformatted.ends_with(b"func("));
}

#[test]
fn non_go_files_are_not_formatted() {
    let importer = Importer::new("example.com/app");
    let out = frame_and_format("doc.md", "app", "1.0.0", &importer, b"# doc", &Rejecting)
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(out, b"# doc".to_vec());
    let go = frame_and_format("a.go", "app", "1.0.0", &importer, b"", &Passthrough)
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(go.starts_with(b"// Code generated"));
}

#[test]
fn formatter_input_failures_are_reported() {
    assert_eq!(stdin_result(Ok(()), true, b""), Ok(()));
    assert_eq!(stdin_result(Ok(()), false, b"1:1: bad\n"), Err("1:1: bad".to_string()));

    let broken = || Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"));
    assert_eq!(
        stdin_result(broken(), true, b""),
        Err("writing formatter input: broken pipe".to_string())
    );
    assert_eq!(
        stdin_result(broken(), false, b"1:1: bad"),
        Err("1:1: bad (writing formatter input: broken pipe)".to_string())
    );
}
