use {
    crate::opts::{Opts, DEFAULT_PAGES},
    anyhow::{bail, Context},
    std::{path::Path, process::ExitCode},
    tracing::{event, Level},
    wasm_pages_lib::{
        config::PatchConfig, leb128, Error, MemoryLimits, MemorySection, Patch, PAGE_SIZE,
    },
};

pub(crate) fn exec(opts: Opts) -> ExitCode {
    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            event!(Level::ERROR, "{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Report the memory section of the input module and, if requested, patch its initial pages.
fn run(opts: &Opts) -> Result<(), anyhow::Error> {
    let config = match opts.config_path() {
        Some(path) => PatchConfig::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => PatchConfig::default(),
    };

    let input = opts.input();
    let memory = match wasm_pages_lib::inspect_file(input)
        .with_context(|| format!("failed to inspect {}", input.display()))?
    {
        Some(memory) => memory,
        None => {
            event!(Level::INFO, "no memory section found; nothing to patch");
            return Ok(());
        }
    };
    report(&memory);

    let pages = opts
        .pages()
        .or_else(|| config.initial_pages())
        .unwrap_or(DEFAULT_PAGES);
    if pages == 0 {
        event!(Level::INFO, "page count is 0; leaving the module unchanged");
        return Ok(());
    }

    let limits = memory.limits();
    let patch = match Patch::initial_pages(limits, pages) {
        Ok(patch) => patch,
        // Only a write needs the new value to fit; a dry run just reports it.
        Err(e) if !opts.write() => {
            event!(
                Level::WARN,
                "dry run: {:#}; the module would be left unchanged",
                plan_error(e, pages, limits)
            );
            return Ok(());
        }
        Err(e) => return Err(plan_error(e, pages, limits)),
    };

    if !opts.write() {
        event!(
            Level::INFO,
            "dry run: would set initial pages to {pages} (pass --write to apply)"
        );
        return Ok(());
    }

    event!(Level::INFO, "setting initial pages to {pages}");
    let written = patch
        .apply(input)
        .with_context(|| format!("failed to patch {}", input.display()))?;
    event!(
        Level::INFO,
        "{written} bytes written at {:#x}",
        patch.offset()
    );

    verify(input, limits, pages)
}

/// Attach the requested page count to a planning error, and the field widths when it is the
/// encoding that does not fit.
fn plan_error(e: Error, pages: u64, limits: &MemoryLimits) -> anyhow::Error {
    let context = match e {
        Error::Overflow { .. } => format!(
            "cannot set initial pages to {pages} ({} byte(s) needed, {} available)",
            leb128::encoded_len(pages),
            limits.initial_pages_width()
        ),
        _ => format!("cannot set initial pages to {pages}"),
    };
    anyhow::Error::from(e).context(context)
}

fn report(memory: &MemorySection) {
    let section = memory.section();
    let limits = memory.limits();
    event!(
        Level::INFO,
        "memory section (offset {:#x}, {} bytes)",
        section.content_offset,
        section.size
    );
    match limits.maximum_pages() {
        Some(maximum) => event!(Level::INFO, "    maxPages {maximum}"),
        None => event!(Level::INFO, "    maxPages unlimited"),
    }
    event!(
        Level::INFO,
        "    initial pages {} (offset {:#x}, {} bytes)",
        limits.initial_pages(),
        limits.initial_pages_offset(),
        limits.initial_pages_width()
    );
    event!(
        Level::DEBUG,
        "initial memory size is {} bytes",
        limits.initial_pages().saturating_mul(PAGE_SIZE)
    );
}

/// Re-read the patched module and check that only the initial page count changed.
fn verify(input: &Path, before: &MemoryLimits, pages: u64) -> Result<(), anyhow::Error> {
    let after = wasm_pages_lib::inspect_file(input)
        .with_context(|| format!("failed to re-read {} after patching", input.display()))?
        .context("memory section missing after patching")?;
    let after = after.limits();

    if after.initial_pages() != pages
        || after.initial_pages_offset() != before.initial_pages_offset()
        || after.initial_pages_width() != before.initial_pages_width()
        || after.maximum_pages() != before.maximum_pages()
    {
        bail!(
            "verification failed: expected initial pages {pages} at {:#x} ({} bytes), \
             found {} at {:#x} ({} bytes)",
            before.initial_pages_offset(),
            before.initial_pages_width(),
            after.initial_pages(),
            after.initial_pages_offset(),
            after.initial_pages_width()
        );
    }

    event!(
        Level::INFO,
        "verified initial pages {pages} at {:#x}",
        after.initial_pages_offset()
    );
    Ok(())
}
