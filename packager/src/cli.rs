//! CLI argument definitions for the packager binaries.
//!
//! Each binary parses one of the structs below. They share [`CommonArgs`] so
//! workspace selection and verbosity behave the same everywhere.

use camino::Utf8PathBuf;
use clap::error::ErrorKind;
use clap::{Args, Parser, ValueEnum};

/// Exit status for a command line clap rejected or answered itself.
///
/// `--help` and `--version` succeed; every other parse error is bad input
/// and exits 1 rather than clap's default of 2.
#[must_use]
pub fn parse_error_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Parse the process arguments, exiting through [`parse_error_exit_code`]
/// when clap rejects them or prints help.
#[must_use]
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.print().is_err() {
                // Nothing left to report to.
            }
            std::process::exit(parse_error_exit_code(err.kind()));
        }
    }
}

/// Options every packager binary accepts.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonArgs {
    /// Workspace root [default: search upwards from the current directory].
    #[arg(long, value_name = "DIR")]
    pub workspace_root: Option<Utf8PathBuf>,

    /// Release configuration file [default: <workspace>/release.toml].
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Cross-compile the EasyJS toolchain and assemble a versioned release.
#[derive(Parser, Debug, Clone)]
#[command(name = "easyjs-release")]
#[command(version, about)]
#[command(long_about = concat!(
    "Cross-compile the EasyJS toolchain and assemble a versioned release.\n\n",
    "The standard library module is regenerated first. Each configured target ",
    "is then compiled in release mode, checked for the expected binary, and ",
    "copied to releases/<version>/<platform>/. The first failure aborts the run.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Release the version in lib/version:\n",
    "    $ easyjs-release\n\n",
    "  Release under an explicit version:\n",
    "    $ easyjs-release --release-version v0.5.0\n\n",
    "  Preview the release plan:\n",
    "    $ easyjs-release --dry-run",
))]
pub struct ReleaseCli {
    /// Shared options.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Release version [default: contents of the standard library version file].
    #[arg(long, value_name = "VERSION")]
    pub release_version: Option<String>,

    /// Show the release plan and exit without compiling or writing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Regenerate the embedded EasyJS standard library module.
#[derive(Parser, Debug, Clone)]
#[command(name = "easyjs-embed-std")]
#[command(version, about)]
pub struct EmbedCli {
    /// Shared options.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Fail if the generated module is out of date instead of writing it.
    #[arg(long)]
    pub check: bool,
}

/// Front-end commands.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEndCommand {
    /// Print usage.
    Help,
    /// Embed the standard library and compile the toolchain.
    Build,
}

/// Build the EasyJS toolchain for local use.
#[derive(Parser, Debug, Clone)]
#[command(name = "easyjs-build")]
#[command(version, about)]
#[command(after_help = concat!(
    "PLATFORMS:\n",
    "  windows   (aliases: win, win32, win64)\n",
    "  linux     (aliases: ubuntu, debian, fedora, arch)\n",
    "  mac       (aliases: macos, osx, darwin)\n\n",
    "EXAMPLES:\n",
    "  Debug build for this machine:\n",
    "    $ easyjs-build build\n\n",
    "  Optimised build for Windows:\n",
    "    $ easyjs-build build windows --release\n\n",
    "  Build and copy the binary into bin/:\n",
    "    $ easyjs-build build --install",
))]
pub struct BuildCli {
    /// What to do.
    #[arg(value_enum, value_name = "COMMAND")]
    pub command: FrontEndCommand,

    /// Platform to build for [default: this machine].
    #[arg(value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// Build with optimisations.
    #[arg(short, long)]
    pub release: bool,

    /// Copy the built binary into <workspace>/bin/.
    #[arg(long)]
    pub install: bool,

    /// Shared options.
    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    #[test]
    fn cli_definitions_are_consistent() {
        ReleaseCli::command().debug_assert();
        EmbedCli::command().debug_assert();
        BuildCli::command().debug_assert();
    }

    #[test]
    fn release_defaults() {
        let cli = ReleaseCli::try_parse_from(["easyjs-release"]).expect("parses");
        assert_eq!(cli.common, CommonArgs::default());
        assert!(cli.release_version.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn release_accepts_overrides() {
        let cli = ReleaseCli::try_parse_from([
            "easyjs-release",
            "--workspace-root",
            "/src/easyjs",
            "--release-version",
            "v0.5.0",
            "--dry-run",
            "-vv",
        ])
        .expect("parses");
        assert_eq!(
            cli.common.workspace_root,
            Some(Utf8PathBuf::from("/src/easyjs"))
        );
        assert_eq!(cli.release_version.as_deref(), Some("v0.5.0"));
        assert!(cli.dry_run);
        assert_eq!(cli.common.verbosity, 2);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let err = ReleaseCli::try_parse_from(["easyjs-release", "-q", "-v"])
            .expect_err("conflicting flags");
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn embed_check_flag() {
        let cli = EmbedCli::try_parse_from(["easyjs-embed-std", "--check"]).expect("parses");
        assert!(cli.check);
    }

    #[rstest]
    #[case::bare(&["easyjs-build", "build"], FrontEndCommand::Build, None, false)]
    #[case::platform(&["easyjs-build", "build", "ubuntu"], FrontEndCommand::Build, Some("ubuntu"), false)]
    #[case::short_release(&["easyjs-build", "build", "mac", "-r"], FrontEndCommand::Build, Some("mac"), true)]
    #[case::long_release(&["easyjs-build", "--release", "build"], FrontEndCommand::Build, None, true)]
    #[case::help(&["easyjs-build", "help"], FrontEndCommand::Help, None, false)]
    fn build_front_end_parses(
        #[case] args: &[&str],
        #[case] command: FrontEndCommand,
        #[case] platform: Option<&str>,
        #[case] release: bool,
    ) {
        let cli = BuildCli::try_parse_from(args).expect("parses");
        assert_eq!(cli.command, command);
        assert_eq!(cli.platform.as_deref(), platform);
        assert_eq!(cli.release, release);
    }

    #[test]
    fn build_install_flag() {
        let cli = BuildCli::try_parse_from(["easyjs-build", "build", "--install"]).expect("parses");
        assert!(cli.install);
        let cli = BuildCli::try_parse_from(["easyjs-build", "build"]).expect("parses");
        assert!(!cli.install);
    }

    #[rstest]
    #[case::release_flag(&["easyjs-release", "--bogus"])]
    #[case::embed_positional(&["easyjs-embed-std", "extra"])]
    fn bad_input_maps_to_exit_one(#[case] args: &[&str]) {
        let err = match args.first().copied() {
            Some("easyjs-release") => ReleaseCli::try_parse_from(args).map(drop),
            _ => EmbedCli::try_parse_from(args).map(drop),
        }
        .expect_err("bad input");
        assert_eq!(parse_error_exit_code(err.kind()), 1);
    }

    #[rstest]
    #[case::help(&["easyjs-release", "--help"])]
    #[case::version(&["easyjs-release", "--version"])]
    fn help_and_version_map_to_exit_zero(#[case] args: &[&str]) {
        let err = ReleaseCli::try_parse_from(args).expect_err("clap answers directly");
        assert_eq!(parse_error_exit_code(err.kind()), 0);
    }

    #[rstest]
    #[case::unknown_command(&["easyjs-build", "deploy"])]
    #[case::unknown_flag(&["easyjs-build", "build", "--fast"])]
    #[case::missing_command(&["easyjs-build"])]
    fn build_front_end_rejects_bad_input(#[case] args: &[&str]) {
        assert!(BuildCli::try_parse_from(args).is_err());
    }
}
