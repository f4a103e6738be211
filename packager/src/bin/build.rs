//! Developer build front-end: `easyjs-build (help | build) [PLATFORM] [-r] [--install]`.
//!
//! Unknown commands, flags, and platforms exit with status 1. `help`,
//! `--help`, and `--version` exit with status 0.

use clap::CommandFactory;
use easyjs_packager::builder::{BuildMode, CargoCompiler};
use easyjs_packager::cli::{BuildCli, FrontEndCommand, parse_or_exit};
use easyjs_packager::config::ReleaseConfig;
use easyjs_packager::error::Result;
use easyjs_packager::local_build::{LocalBuild, run_local_build};
use easyjs_packager::logger;
use easyjs_packager::output::exit_code_for_run_result;
use easyjs_packager::platform::Platform;
use easyjs_packager::workspace::resolve_workspace_root;
use std::io::Write;

fn main() {
    let cli: BuildCli = parse_or_exit();

    logger::init(cli.common.verbosity);
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &BuildCli, stderr: &mut dyn Write) -> Result<()> {
    match cli.command {
        FrontEndCommand::Help => {
            let help = BuildCli::command().render_long_help();
            write!(std::io::stdout(), "{help}")?;
            Ok(())
        }
        FrontEndCommand::Build => build(cli, stderr),
    }
}

fn build(cli: &BuildCli, stderr: &mut dyn Write) -> Result<()> {
    let platform = cli
        .platform
        .as_deref()
        .map_or_else(|| Ok(Platform::host()), Platform::resolve)?;
    let workspace_root = resolve_workspace_root(cli.common.workspace_root.as_deref())?;
    let config = ReleaseConfig::load(&workspace_root, cli.common.config.as_deref())?;

    let local = LocalBuild {
        workspace_root: &workspace_root,
        config: &config,
        platform,
        mode: BuildMode::from_release_flag(cli.release),
        quiet: cli.common.quiet,
        install: cli.install,
    };
    run_local_build(&local, &CargoCompiler, stderr)?;
    Ok(())
}
