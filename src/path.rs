use std::{
    error::Error,
    fmt::Display,
    path::{self, Component, Path, PathBuf},
};

#[derive(Debug)]
#[non_exhaustive]
pub struct StripPrefixError {
    path: PathBuf,
    base: PathBuf,
    inner: path::StripPrefixError,
}

impl Display for StripPrefixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cannot strip prefix {:?} from path {:?}",
            self.base, self.path
        )
    }
}

impl Error for StripPrefixError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.inner)
    }
}

/// Express `path` relative to `base`, which must be one of its ancestors.
pub(crate) fn relative_to(base: &Path, path: &Path) -> Result<PathBuf, StripPrefixError> {
    path.strip_prefix(base)
        .map(ToOwned::to_owned)
        .map_err(|inner| StripPrefixError {
            path: path.to_owned(),
            base: base.to_owned(),
            inner,
        })
}

/// Lexically normalize `path`: drop `.` components and fold `..` into the
/// preceding component. The filesystem is never consulted, so symlinks are
/// not resolved.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = normalized.components().next_back();
                if matches!(last, Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !matches!(last, Some(Component::RootDir | Component::Prefix(_))) {
                    // `/..` is `/`, but a leading `..` of a relative path is kept
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Resolve `path` against `base` unless it is already absolute, then
/// normalize the result.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

/// Strip the first `up` directory segments from `relative_path`.
///
/// The file name itself is never stripped: when `up` is greater than or equal
/// to the number of directory segments, only the file name remains.
pub fn up_adjusted_path(relative_path: &Path, up: u32) -> PathBuf {
    if up == 0 {
        return relative_path.to_owned();
    }
    let segments: Vec<_> = relative_path
        .components()
        .filter(|component| matches!(component, Component::Normal(_)))
        .collect();
    let directory_segments = segments.len().saturating_sub(1);
    let skip = usize::try_from(up)
        .unwrap_or(usize::MAX)
        .min(directory_segments);
    segments.into_iter().skip(skip).collect()
}
