use crate::common::{module, Test, TestResult};

#[test]
fn without_write_nothing_changes() -> TestResult {
    let test = Test::using_bytes(&module(&[0x05, 0x03, 0x01, 0x00, 0x10])).pages(100);
    let out = test.run();
    assert!(out.success, "{out:?}");
    assert!(out.stdout.contains("initial pages 16 (offset 0xc, 1 bytes)"));
    assert!(out
        .stdout
        .contains("dry run: would set initial pages to 100 (pass --write to apply)"));
    assert!(!out.stdout.contains("bytes written"));
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn dry_runs_report_values_that_do_not_fit() -> TestResult {
    let test = Test::using_bytes(&module(&[0x05, 0x03, 0x01, 0x00, 0x10])).pages(300);
    let out = test.run();
    assert!(out.success, "{out:?}");
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains(
        "dry run: cannot set initial pages to 300 (2 byte(s) needed, 1 available): \
         300 cannot be encoded in 1 byte(s); the module would be left unchanged"
    ));
    assert!(out.stderr.is_empty(), "{out:?}");
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn plain_runs_only_inspect() -> TestResult {
    // The default of 2048 pages needs two bytes, but `17` was encoded in one.
    let test = Test::using_wat("(module (memory 17))");
    let out = test.run();
    assert!(out.success, "{out:?}");
    assert_eq!(out.code, Some(0));
    assert!(out.stdout.contains("maxPages unlimited"));
    assert!(out.stdout.contains("initial pages 17 (offset 0xc, 1 bytes)"));
    assert!(out.stdout.contains("cannot set initial pages to 2048"));
    assert!(!out.stdout.contains("bytes written"));
    assert_eq!(test.current(), test.original());
    Ok(())
}

#[test]
fn dry_runs_report_values_above_the_maximum() -> TestResult {
    let test = Test::using_wat("(module (memory 1 2))").pages(3);
    let out = test.run();
    assert!(out.success, "{out:?}");
    assert!(out.stdout.contains(
        "dry run: cannot set initial pages to 3: 3 initial pages exceeds the declared maximum \
         of 2 pages"
    ));
    assert!(!out.stdout.contains("byte(s) needed"));
    assert_eq!(test.current(), test.original());
    Ok(())
}
