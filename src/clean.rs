use std::{
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, info};
use rayon::prelude::*;

use crate::{path::normalize, tsb_config::CopyRule};

#[derive(Debug)]
#[non_exhaustive]
pub struct CleanError {
    directory: PathBuf,
    kind: CleanErrorKind,
}

impl CleanError {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn kind(&self) -> &CleanErrorKind {
        &self.kind
    }
}

impl Display for CleanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            CleanErrorKind::Remove(_) => write!(f, "unable to remove {:?}", self.directory),
            CleanErrorKind::ContainsProject(project_directory) => write!(
                f,
                "refusing to remove {:?}: it contains the project directory {:?}",
                self.directory, project_directory
            ),
        }
    }
}

impl std::error::Error for CleanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            CleanErrorKind::Remove(err) => Some(err),
            CleanErrorKind::ContainsProject(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum CleanErrorKind {
    #[non_exhaustive]
    Remove(io::Error),
    #[non_exhaustive]
    ContainsProject(PathBuf),
}

/// `rm -rf`: a missing path is not an error.
fn remove_path(path: &Path) -> io::Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) => Err(err),
    };
    match result {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Remove every destination directory of `rule`, unless the rule sets
/// `skipClean`.
pub fn clean(project_directory: &Path, rule: &CopyRule) -> Result<(), CleanError> {
    if rule.skip_clean {
        info!(
            "Skip removing directories {:?} in {:?}",
            rule.out_directories, project_directory
        );
        return Ok(());
    }

    let project_directory = normalize(project_directory);
    rule.out_directories.par_iter().try_for_each(|out_directory| {
        let directory = normalize(&project_directory.join(out_directory));
        if project_directory.starts_with(&directory) {
            return Err(CleanError {
                directory,
                kind: CleanErrorKind::ContainsProject(project_directory.clone()),
            });
        }
        debug!("Removing directory {:?}", directory);
        remove_path(&directory).map_err(|err| CleanError {
            directory,
            kind: CleanErrorKind::Remove(err),
        })
    })
}
