use std::{
    collections::BTreeSet,
    fmt::Display,
    fs, io,
    path::{Path, PathBuf},
};

use log::{debug, trace};
use rayon::prelude::*;

use crate::plan::CopyOperation;

#[derive(Debug)]
#[non_exhaustive]
pub struct CopyError {
    kind: CopyErrorKind,
}

impl CopyError {
    pub fn kind(&self) -> &CopyErrorKind {
        &self.kind
    }
}

impl Display for CopyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            CopyErrorKind::CreateDirectory { directory, .. } => {
                write!(f, "unable to create directory {:?}", directory)
            }
            CopyErrorKind::CopyFile { from, to, .. } => {
                write!(f, "unable to copy {:?} to {:?}", from, to)
            }
        }
    }
}

impl std::error::Error for CopyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            CopyErrorKind::CreateDirectory { inner, .. } => Some(inner),
            CopyErrorKind::CopyFile { inner, .. } => Some(inner),
        }
    }
}

#[derive(Debug)]
pub enum CopyErrorKind {
    #[non_exhaustive]
    CreateDirectory { directory: PathBuf, inner: io::Error },
    #[non_exhaustive]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        inner: io::Error,
    },
}

/// Perform every copy in `operations`, overwriting existing files.
///
/// All destination directories are created before the first file is copied.
/// Copies then run in parallel; the first failure is returned and nothing
/// already written is rolled back.
pub fn execute(operations: &[CopyOperation]) -> Result<(), CopyError> {
    let directories: BTreeSet<&Path> = operations
        .iter()
        .filter_map(|operation| operation.to.parent())
        .collect();

    directories.par_iter().try_for_each(|directory| {
        trace!("Creating directory {:?}", directory);
        fs::create_dir_all(directory).map_err(|inner| CopyError {
            kind: CopyErrorKind::CreateDirectory {
                directory: directory.to_path_buf(),
                inner,
            },
        })
    })?;

    operations.par_iter().try_for_each(|operation| {
        fs::copy(&operation.from, &operation.to)
            .map(|_| ())
            .map_err(|inner| CopyError {
                kind: CopyErrorKind::CopyFile {
                    from: operation.from.clone(),
                    to: operation.to.clone(),
                    inner,
                },
            })
    })?;

    debug!(
        "Copied {} file(s) into {} director(ies)",
        operations.len(),
        directories.len()
    );
    Ok(())
}
