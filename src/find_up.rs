use std::path::{Path, PathBuf};

/// Find the nearest directory, starting at `starting_from` and walking toward
/// the filesystem root, that contains a file named `target_filename`.
pub(crate) fn find_directory_containing(
    starting_from: &Path,
    target_filename: &str,
) -> Option<PathBuf> {
    let starting_directory = if starting_from.is_dir() {
        starting_from
    } else {
        starting_from.parent().unwrap_or_else(|| Path::new("."))
    };

    let mut path: PathBuf = starting_directory.to_owned();

    loop {
        path.push(target_filename);
        let found_target = path.is_file();

        if found_target {
            // Pop the filename because we want to return the directory
            path.pop();
            break Some(path);
        }

        if !(path.pop() && path.pop()) {
            // remove file && remove parent
            break None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_file_in_ancestor() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("package.json"), "{}").unwrap();
        let nested = root.path().join("packages/foo/src");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_directory_containing(&nested, "package.json"),
            Some(root.path().to_owned())
        );
    }

    #[test]
    fn starts_from_parent_of_a_file() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("package.json"), "{}").unwrap();
        let tsconfig = root.path().join("tsconfig.json");
        std::fs::write(&tsconfig, "{}").unwrap();

        assert_eq!(
            find_directory_containing(&tsconfig, "package.json"),
            Some(root.path().to_owned())
        );
    }
}
