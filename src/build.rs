//! Mode dispatch: compile (optionally), then copy or clean every selected
//! project.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use log::{debug, info};
use rayon::prelude::*;

use crate::{
    clean::clean,
    command::CommandRunner,
    copy::execute,
    error::Result,
    plan::plan,
    tsb_config::CopyConfig,
    tsconfig::{resolve_references, root_config_path},
};

/// Whether copy rules populate or remove their output directories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Copy,
    Clean,
}

/// Which projects take part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Run `tsc --build`, then every project reachable through references.
    Build,
    /// No compilation, root project only.
    CopyOnly,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub target: Target,
    pub mode: Mode,
    /// Arguments forwarded to `tsc`, without `--build` and `--clean`.
    pub tsc_args: Vec<String>,
}

impl Invocation {
    /// The argument list for the compilation step.
    pub fn compiler_args(&self) -> Vec<String> {
        let mut args = vec![String::from("--build")];
        if self.mode == Mode::Clean {
            args.push(String::from("--clean"));
        }
        args.extend(self.tsc_args.iter().cloned());
        args
    }
}

/// Load and validate the copy configuration of every project up front, so a
/// bad `tsbconfig.json` anywhere stops the run before any file is touched.
pub fn load_configs<'a, I>(project_directories: I) -> Result<Vec<(PathBuf, CopyConfig)>>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let mut configs = Vec::new();
    for project_directory in project_directories {
        if let Some(config) = CopyConfig::from_directory(project_directory)? {
            configs.push((project_directory.clone(), config));
        }
    }
    Ok(configs)
}

/// Apply every rule of `config` in declaration order.
pub fn process_project(project_directory: &Path, config: &CopyConfig, mode: Mode) -> Result<()> {
    debug!(
        "Executing {:?} for {:?}",
        mode,
        CopyConfig::config_file(project_directory)
    );
    for rule in &config.copy_files {
        match mode {
            Mode::Clean => clean(project_directory, rule)?,
            Mode::Copy => execute(&plan(project_directory, rule)?)?,
        }
    }
    Ok(())
}

/// Copy or clean every project in `project_directories`. Projects without a
/// `tsbconfig.json` are skipped; the rest run in parallel.
pub fn process_projects<'a, I>(project_directories: I, mode: Mode) -> Result<()>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let configs = load_configs(project_directories)?;
    debug!("Found {} project(s) with a copy configuration", configs.len());
    configs
        .par_iter()
        .try_for_each(|(project_directory, config)| process_project(project_directory, config, mode))
}

/// The whole run: locate the root config, compile when asked to, pick the
/// projects and process them.
pub fn run<R>(invocation: &Invocation, working_directory: &Path, runner: &R) -> Result<()>
where
    R: CommandRunner + ?Sized,
{
    let root_config = root_config_path(&invocation.tsc_args, working_directory)?;
    debug!("TSConfig path: {:?}", root_config);

    let project_directories: BTreeSet<PathBuf> = match invocation.target {
        Target::Build => {
            let output = runner.run(&invocation.compiler_args())?;
            for line in output.lines().filter(|line| !line.is_empty()) {
                info!("{}", line);
            }
            resolve_references(runner, &root_config)?
        }
        Target::CopyOnly => root_config.parent().map(ToOwned::to_owned).into_iter().collect(),
    };
    debug!("Project directories: {:?}", project_directories);

    process_projects(&project_directories, invocation.mode)
}
