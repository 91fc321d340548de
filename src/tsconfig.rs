//! Locating the root TypeScript configuration and walking its project
//! references.

use std::{
    collections::BTreeSet,
    fmt::Display,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use serde_json::Value;

use crate::{
    command::{CommandError, CommandRunner},
    path::{absolutize, normalize},
};

pub const DEFAULT_CONFIG_FILE_NAME: &str = "tsconfig.json";

#[derive(Debug)]
#[non_exhaustive]
pub struct RootConfigError {
    kind: RootConfigErrorKind,
}

impl Display for RootConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            RootConfigErrorKind::MultipleConfigs(configs) => write!(
                f,
                "cannot handle more than one config, found {}",
                configs.join(", ")
            ),
            RootConfigErrorKind::NotFound(path) => write!(
                f,
                "expected to find ts config at {:?}, but it was not there",
                path
            ),
        }
    }
}

impl std::error::Error for RootConfigError {}

#[derive(Debug)]
pub enum RootConfigErrorKind {
    #[non_exhaustive]
    MultipleConfigs(Vec<String>),
    #[non_exhaustive]
    NotFound(PathBuf),
}

/// Pick the root configuration file out of the arguments forwarded to `tsc`.
///
/// Any argument that is not a flag and ends in `.json` names a config; at
/// most one may be given. Without one, `tsconfig.json` in
/// `working_directory` is used.
pub fn root_config_path<S: AsRef<str>>(
    args: &[S],
    working_directory: &Path,
) -> Result<PathBuf, RootConfigError> {
    let configs: Vec<&str> = args
        .iter()
        .map(AsRef::as_ref)
        .filter(|arg| !arg.starts_with('-') && arg.ends_with(".json"))
        .collect();

    let project_file = match configs.as_slice() {
        [] => DEFAULT_CONFIG_FILE_NAME,
        [config] => *config,
        _ => {
            return Err(RootConfigError {
                kind: RootConfigErrorKind::MultipleConfigs(
                    configs.iter().map(|s| s.to_string()).collect(),
                ),
            })
        }
    };

    let config_path = absolutize(working_directory, Path::new(project_file));
    if !config_path.is_file() {
        return Err(RootConfigError {
            kind: RootConfigErrorKind::NotFound(config_path),
        });
    }
    Ok(config_path)
}

#[derive(Debug)]
#[non_exhaustive]
pub struct ResolveError {
    config: PathBuf,
    kind: ResolveErrorKind,
}

impl ResolveError {
    pub fn config(&self) -> &Path {
        &self.config
    }

    pub fn kind(&self) -> &ResolveErrorKind {
        &self.kind
    }
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ResolveErrorKind::ShowConfig(_) => {
                write!(f, "unable to get effective config of {:?}", self.config)
            }
            ResolveErrorKind::Parse(_) => {
                write!(f, "error parsing effective config of {:?}", self.config)
            }
            ResolveErrorKind::MissingPath { reference } => write!(
                f,
                "no path found on reference {} in {:?}",
                reference, self.config
            ),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ResolveErrorKind::ShowConfig(err) => Some(err),
            ResolveErrorKind::Parse(err) => Some(err),
            ResolveErrorKind::MissingPath { .. } => None,
        }
    }
}

#[derive(Debug)]
pub enum ResolveErrorKind {
    #[non_exhaustive]
    ShowConfig(CommandError),
    #[non_exhaustive]
    Parse(serde_json::Error),
    #[non_exhaustive]
    MissingPath { reference: String },
}

/// Ask the compiler for the effective configuration of `config`, with every
/// `extends` already flattened.
fn effective_config<R>(runner: &R, config: &Path) -> Result<Value, ResolveErrorKind>
where
    R: CommandRunner + ?Sized,
{
    let args = [
        String::from("--showConfig"),
        String::from("--project"),
        config.display().to_string(),
    ];
    let stdout = runner.run(&args).map_err(ResolveErrorKind::ShowConfig)?;
    serde_json::from_str(&stdout).map_err(ResolveErrorKind::Parse)
}

/// A reference names either a config file or a directory holding a
/// `tsconfig.json`.
fn referenced_config_file(reference: PathBuf) -> PathBuf {
    if reference.extension().map_or(false, |extension| extension == "json") {
        reference
    } else {
        reference.join(DEFAULT_CONFIG_FILE_NAME)
    }
}

/// Extract the referenced config files from an effective configuration,
/// resolved against the directory of the config that declares them.
fn references(effective_config: &Value, config: &Path) -> Result<Vec<PathBuf>, ResolveErrorKind> {
    let Some(references) = effective_config.get("references").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    let base = config.parent().unwrap_or_else(|| Path::new("."));

    references
        .iter()
        .map(|reference| {
            let path = reference
                .get("path")
                .and_then(Value::as_str)
                .filter(|path| !path.is_empty())
                .ok_or_else(|| ResolveErrorKind::MissingPath {
                    reference: reference.to_string(),
                })?;
            Ok(referenced_config_file(absolutize(base, Path::new(path))))
        })
        .collect()
}

/// The directory of every project reachable from `root_config` through
/// `references`, including the root project itself.
///
/// Each config is visited once. A reference cycle is not an error: the
/// revisited config is skipped.
pub fn resolve_references<R>(
    runner: &R,
    root_config: &Path,
) -> Result<BTreeSet<PathBuf>, ResolveError>
where
    R: CommandRunner + ?Sized,
{
    let root_config = normalize(root_config);
    let mut visited = BTreeSet::from([root_config.clone()]);
    let mut worklist = vec![root_config];

    while let Some(config) = worklist.pop() {
        trace!("Reading references of {:?}", config);
        let referenced = effective_config(runner, &config)
            .and_then(|effective_config| references(&effective_config, &config))
            .map_err(|kind| ResolveError {
                config: config.clone(),
                kind,
            })?;

        for reference in referenced {
            if visited.insert(reference.clone()) {
                debug!("Found reference {:?} in {:?}", reference, config);
                worklist.push(reference);
            } else {
                debug!("Already visited {:?}, referenced again by {:?}", reference, config);
            }
        }
    }

    Ok(visited
        .iter()
        .map(|config| {
            config
                .parent()
                .map_or_else(|| PathBuf::from("."), ToOwned::to_owned)
        })
        .collect())
}
