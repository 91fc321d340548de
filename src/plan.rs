//! Turning a [`CopyRule`] into concrete (from, to) pairs.

use std::{
    borrow::Cow,
    collections::{BTreeSet, HashMap},
    fmt::Display,
    path::{Path, PathBuf},
};

use globwalk::{FileType, GlobWalkerBuilder};
use log::{debug, trace, warn};

use crate::{
    path::{self, relative_to, up_adjusted_path},
    tsb_config::CopyRule,
};

/// A single file copy, both paths absolute.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CopyOperation {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct PlanError {
    project_directory: PathBuf,
    kind: PlanErrorKind,
}

impl Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            PlanErrorKind::Pattern { pattern, .. } => write!(
                f,
                "invalid glob pattern {:?} in {:?}",
                pattern, self.project_directory
            ),
            PlanErrorKind::Walk(_) => write!(
                f,
                "unable to walk directory tree {:?}",
                self.project_directory
            ),
            PlanErrorKind::Path(_) => write!(f, "unable to strip path prefix"),
        }
    }
}

impl std::error::Error for PlanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            PlanErrorKind::Pattern { inner, .. } => Some(inner),
            PlanErrorKind::Walk(err) => Some(err),
            PlanErrorKind::Path(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum PlanErrorKind {
    #[non_exhaustive]
    Pattern {
        pattern: String,
        inner: globwalk::GlobError,
    },
    #[non_exhaustive]
    Walk(globwalk::WalkError),
    #[non_exhaustive]
    Path(path::StripPrefixError),
}

impl From<globwalk::WalkError> for PlanErrorKind {
    fn from(err: globwalk::WalkError) -> Self {
        Self::Walk(err)
    }
}

impl From<path::StripPrefixError> for PlanErrorKind {
    fn from(err: path::StripPrefixError) -> Self {
        Self::Path(err)
    }
}

/// Root `pattern` at the walk base. Without a leading `/` globwalk would
/// match a slash-free pattern at any depth, including inside out directories.
fn anchored(pattern: &str) -> Cow<'_, str> {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    if pattern.starts_with('/') {
        Cow::Borrowed(pattern)
    } else {
        Cow::Owned(format!("/{}", pattern))
    }
}

/// Expand every pattern against `project_directory` and return the union of
/// matched files, relative to `project_directory`.
///
/// Patterns are anchored to `project_directory`: `*.txt` matches only its
/// top-level text files.
pub fn expand_files<S: AsRef<str>>(
    project_directory: &Path,
    patterns: &[S],
) -> Result<BTreeSet<PathBuf>, PlanError> {
    (|| {
        let mut files = BTreeSet::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            trace!(" - pattern: {} (cwd: {:?})", pattern, project_directory);
            let walker = GlobWalkerBuilder::new(project_directory, anchored(pattern))
                .file_type(FileType::FILE)
                .follow_links(true)
                .min_depth(0)
                .build()
                .map_err(|inner| PlanErrorKind::Pattern {
                    pattern: pattern.to_owned(),
                    inner,
                })?;
            for dir_entry in walker {
                let dir_entry = dir_entry?;
                files.insert(relative_to(project_directory, dir_entry.path())?);
            }
        }
        Ok(files)
    })()
    .map_err(|kind| PlanError {
        project_directory: project_directory.to_owned(),
        kind,
    })
}

/// Pair every file with every destination directory of `rule`.
///
/// `files` are relative to `project_directory`; so are the rule's
/// destination directories. A file that would be copied onto itself is
/// dropped. When `up` maps several files to one destination, the last file
/// in iteration order wins.
pub fn plan_operations<'a, I>(
    project_directory: &Path,
    rule: &CopyRule,
    files: I,
) -> Vec<CopyOperation>
where
    I: IntoIterator<Item = &'a PathBuf>,
{
    let mut operations: Vec<CopyOperation> = Vec::new();
    let mut by_destination: HashMap<PathBuf, usize> = HashMap::new();
    for file in files {
        let from = path::normalize(&project_directory.join(file));
        let destination_relative_path = up_adjusted_path(file, rule.up);
        for out_directory in &rule.out_directories {
            let to = path::normalize(
                &project_directory
                    .join(out_directory)
                    .join(&destination_relative_path),
            );
            if to == from {
                debug!("   - [skip] {} is its own destination", from.display());
                continue;
            }
            debug!("   - [from] {}", from.display());
            debug!("     [to]   {}", to.display());
            match by_destination.get(&to) {
                Some(&index) => {
                    warn!(
                        "{} and {} both map to {}, keeping {}",
                        operations[index].from.display(),
                        from.display(),
                        to.display(),
                        from.display()
                    );
                    operations[index].from = from.clone();
                }
                None => {
                    by_destination.insert(to.clone(), operations.len());
                    operations.push(CopyOperation {
                        from: from.clone(),
                        to,
                    });
                }
            }
        }
    }
    operations
}

/// Expand the globs of `rule` and compute every copy it calls for.
pub fn plan(project_directory: &Path, rule: &CopyRule) -> Result<Vec<CopyOperation>, PlanError> {
    let files = expand_files(project_directory, &rule.files)?;
    debug!(
        "{} file(s) matched {:?} in {:?}",
        files.len(),
        rule.files,
        project_directory
    );
    Ok(plan_operations(project_directory, rule, &files))
}
