//! Common values and types used by the integration tests.

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};
use tempfile::TempDir;

/// The preamble of every version 1 core module.
pub const PREAMBLE: [u8; 8] = [0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00];

/// A catch-all error, so we can easily use `?` in test cases.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Handy alias for the return type of tests
pub type TestResult = Result<(), Error>;

/// Build a module from the preamble followed by raw section bytes.
pub fn module(sections: &[u8]) -> Vec<u8> {
    let mut bytes = PREAMBLE.to_vec();
    bytes.extend_from_slice(sections);
    bytes
}

/// A builder for running the `wasm-pages` binary against a scratch copy of a module.
pub struct Test {
    dir: TempDir,
    module_path: PathBuf,
    original: Vec<u8>,
    args: Vec<String>,
}

impl Test {
    /// Run against a module given in the WebAssembly text format.
    pub fn using_wat(wat: &str) -> Self {
        let bytes = wat::parse_str(wat).expect("valid module text");
        Self::using_bytes(&bytes)
    }

    /// Run against a module given as raw bytes.
    pub fn using_bytes(bytes: &[u8]) -> Self {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let module_path = dir.path().join("module.wasm");
        fs::write(&module_path, bytes).expect("can write module");
        Self {
            dir,
            module_path,
            original: bytes.to_vec(),
            args: Vec::new(),
        }
    }

    /// Pass `--pages <pages>`.
    pub fn pages(self, pages: u64) -> Self {
        self.arg("--pages").arg(&pages.to_string())
    }

    /// Pass `--write`.
    pub fn write(self) -> Self {
        self.arg("--write")
    }

    /// Write `toml` to a configuration file and pass it with `-C`.
    pub fn config(self, toml: &str) -> Self {
        let path = self.dir.path().join("wasm-pages.toml");
        fs::write(&path, toml).expect("can write config");
        let path = path.display().to_string();
        self.arg("-C").arg(&path)
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_owned());
        self
    }

    pub fn module_path(&self) -> &Path {
        &self.module_path
    }

    /// The module as it was before the run.
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// The module as it is now.
    pub fn current(&self) -> Vec<u8> {
        fs::read(&self.module_path).expect("can read module")
    }

    pub fn run(&self) -> TestOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_wasm-pages"))
            .args(&self.args)
            .arg(&self.module_path)
            .env_remove("RUST_LOG")
            .env_remove("RUST_LOG_PRETTY")
            .output()
            .expect("can run wasm-pages");
        TestOutput::from(output)
    }
}

/// The captured result of a run.
#[derive(Debug)]
pub struct TestOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for TestOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// The offsets at which two equal-length files differ.
pub fn changed_offsets(before: &[u8], after: &[u8]) -> Vec<usize> {
    assert_eq!(before.len(), after.len(), "file length changed");
    before
        .iter()
        .zip(after)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect()
}
