//! EasyJS release CLI entrypoint.
//!
//! Regenerates the standard library module, cross-compiles the toolchain for
//! every configured target, and assembles `releases/<version>/`.

use easyjs_packager::builder::CargoCompiler;
use easyjs_packager::cli::{ReleaseCli, parse_or_exit};
use easyjs_packager::config::ReleaseConfig;
use easyjs_packager::error::Result;
use easyjs_packager::logger;
use easyjs_packager::output::{exit_code_for_run_result, write_stderr_line};
use easyjs_packager::pipeline::{ReleaseContext, release_version, run_release};
use easyjs_packager::workspace::resolve_workspace_root;
use std::io::Write;

fn main() {
    let cli: ReleaseCli = parse_or_exit();
    logger::init(cli.common.verbosity);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &ReleaseCli, stderr: &mut dyn Write) -> Result<()> {
    let workspace_root = resolve_workspace_root(cli.common.workspace_root.as_deref())?;
    let config = ReleaseConfig::load(&workspace_root, cli.common.config.as_deref())?;
    let version = release_version(&config, cli.release_version.as_deref())?;

    let context = ReleaseContext {
        workspace_root: &workspace_root,
        config: &config,
        version: &version,
        quiet: cli.common.quiet,
    };

    if cli.dry_run {
        write_stderr_line(stderr, context.dry_run_text());
        return Ok(());
    }

    run_release(&context, &CargoCompiler, stderr)?;
    Ok(())
}
