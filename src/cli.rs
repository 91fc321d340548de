use clap::{ArgGroup, Parser};

use crate::{
    build::{Invocation, Mode, Target},
    logging::LogConfig,
};

/// Run `tsc --build` and copy the assets listed in each referenced
/// project's `tsbconfig.json` into its output directories.
///
/// Flags of this tool come first; every other argument, including an
/// optional `*.json` project file, is forwarded to `tsc` unchanged.
#[derive(Debug, Parser)]
#[command(name = "tsb", version)]
#[command(group(ArgGroup::new("target").required(true).args(["build", "copy_only"])))]
pub struct Cli {
    /// Enable verbose logging
    #[arg(long)]
    pub debug: bool,

    /// Compile with `tsc --build`, then copy for every referenced project
    #[arg(long)]
    pub build: bool,

    /// Skip compilation and copy for the root project only
    #[arg(long = "copyOnly", visible_alias = "copy-only")]
    pub copy_only: bool,

    /// Remove the configured output directories instead of copying
    #[arg(long)]
    pub clean: bool,

    /// Arguments passed through to tsc
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub tsc_args: Vec<String>,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig { debug: self.debug }
    }

    pub fn invocation(&self) -> Invocation {
        // `--clean` is also a tsc flag, so it may arrive among the forwarded
        // arguments.
        let clean = self.clean || self.tsc_args.iter().any(|arg| arg == "--clean");
        Invocation {
            target: if self.build {
                Target::Build
            } else {
                Target::CopyOnly
            },
            mode: if clean { Mode::Clean } else { Mode::Copy },
            tsc_args: self
                .tsc_args
                .iter()
                .filter(|arg| *arg != "--clean")
                .cloned()
                .collect(),
        }
    }
}
