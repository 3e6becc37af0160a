mod common;
mod dry_run;
mod errors;
