use crate::common::{module, Test, TestResult};

#[test]
fn multiple_memories_are_refused_without_writing() -> TestResult {
    let test = Test::using_bytes(&module(&[0x05, 0x05, 0x02, 0x00, 0x01, 0x00, 0x01]))
        .pages(100)
        .write();
    let out = test.run();
    assert!(!out.success);
    assert_eq!(out.code, Some(1));
    assert!(out.stderr.contains("failed to inspect"));
    assert!(out.stderr.contains("expected exactly one memory, found 2"));
    assert!(!out.stdout.contains("bytes written"));
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn overflowing_values_are_refused_without_writing() -> TestResult {
    let test = Test::using_wat("(module (memory 16))").pages(300).write();
    let out = test.run();
    assert!(!out.success);
    assert!(out
        .stderr
        .contains("cannot set initial pages to 300 (2 byte(s) needed, 1 available)"));
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn values_above_the_maximum_are_refused() -> TestResult {
    let test = Test::using_wat("(module (memory 1 2))").pages(3).write();
    let out = test.run();
    assert!(!out.success);
    assert!(out.stderr.contains(
        "cannot set initial pages to 3: 3 initial pages exceeds the declared maximum of 2 pages"
    ));
    assert!(!out.stderr.contains("byte(s) needed"));
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn truncated_sections_are_reported() -> TestResult {
    let test = Test::using_bytes(&module(&[0x05, 0x05, 0x01, 0x00])).write();
    let out = test.run();
    assert!(!out.success);
    assert!(out.stderr.contains("failed to inspect"));
    assert!(out.stderr.contains("declares 5 bytes of content, but only 2 remain"));
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn non_wasm_files_are_rejected() -> TestResult {
    let test = Test::using_bytes(b"#!/bin/sh\necho hi\n").write();
    let out = test.run();
    assert!(!out.success);
    assert!(out.stderr.contains("Expected a WebAssembly (version 1) module"));
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn components_are_rejected() -> TestResult {
    let test = Test::using_wat("(component)").write();
    let out = test.run();
    assert!(!out.success);
    assert!(out.stderr.contains("found a component"));
    Ok(())
}
