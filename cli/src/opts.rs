//! Command line arguments.

use {
    clap::{ArgAction, Parser},
    std::{
        fs::File,
        io::BufReader,
        path::{Path, PathBuf},
    },
    wasm_pages_lib::{section::read_preamble, Error},
};

/// The page count used when neither `--pages` nor a configuration file sets one.
pub const DEFAULT_PAGES: u64 = 2048;

// Command-line arguments for the wasm-pages CLI.
//
// This struct is used to derive a command-line argument parser. See the
// [clap](https://docs.rs/clap/latest/clap) documentation for more information.
//
// Note that the doc comment below is used as descriptive text in the `--help` output.
/// Set the initial memory size of a WebAssembly module in place.
///
/// Without `--write`, the memory section is only reported.
#[derive(Debug, Parser)]
#[command(name = "wasm-pages", author, version)]
pub struct Opts {
    /// The path to the Wasm module to patch.
    #[arg(value_parser = check_module)]
    input: PathBuf,
    /// The initial page count to set. `0` leaves the module unchanged.
    #[arg(short = 'p', long = "pages")]
    pages: Option<u64>,
    /// Write the new page count to the module, rather than only reporting it.
    #[arg(short = 'w', long = "write")]
    write: bool,
    /// The path to a TOML file containing `[memory]` settings.
    #[arg(short = 'C', long = "config")]
    config_path: Option<PathBuf>,
    /// Verbosity of logs for wasm-pages. `-v` sets the log level to DEBUG and
    /// `-vv` to TRACE. This option will not take effect if you set RUST_LOG
    /// to a value before starting wasm-pages
    #[arg(short = 'v', action = ArgAction::Count)]
    verbosity: u8,
}

impl Opts {
    /// The path to the Wasm module.
    pub fn input(&self) -> &Path {
        self.input.as_ref()
    }

    /// The page count given on the command line, if any.
    pub fn pages(&self) -> Option<u64> {
        self.pages
    }

    /// Whether to write the patch, rather than perform a dry run.
    pub fn write(&self) -> bool {
        self.write
    }

    /// The path to a configuration file.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Verbosity of logs for wasm-pages. `-v` sets the log level to DEBUG and
    /// `-vv` to TRACE. This option will not take effect if you set RUST_LOG
    /// to a value before starting wasm-pages
    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }
}

/// A parsing function used by [`Opts`] to check that the input is a core Wasm module in binary
/// format.
fn check_module(s: &str) -> Result<PathBuf, Error> {
    let path = PathBuf::from(s);
    let mut reader = BufReader::new(File::open(&path)?);
    read_preamble(&mut reader)?;
    Ok(path)
}
