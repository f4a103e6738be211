//! Regenerates the embedded EasyJS standard library module.
//!
//! With `--check` the module is rendered in memory and compared with the
//! committed file instead of being written.

use easyjs_packager::cli::{EmbedCli, parse_or_exit};
use easyjs_packager::config::ReleaseConfig;
use easyjs_packager::embedder::{check_std, embed_std};
use easyjs_packager::error::Result;
use easyjs_packager::logger;
use easyjs_packager::output::{embed_summary, exit_code_for_run_result, write_stderr_line};
use easyjs_packager::workspace::resolve_workspace_root;
use std::io::Write;

fn main() {
    let cli: EmbedCli = parse_or_exit();
    logger::init(cli.common.verbosity);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &EmbedCli, stderr: &mut dyn Write) -> Result<()> {
    let workspace_root = resolve_workspace_root(cli.common.workspace_root.as_deref())?;
    let config = ReleaseConfig::load(&workspace_root, cli.common.config.as_deref())?;

    if cli.check {
        check_std(&config.stdlib)?;
        if !cli.common.quiet {
            write_stderr_line(stderr, format!("{} is up to date", config.stdlib.output));
        }
        return Ok(());
    }

    let report = embed_std(&config.stdlib)?;
    if !cli.common.quiet {
        write_stderr_line(stderr, embed_summary(&report));
    }
    Ok(())
}
