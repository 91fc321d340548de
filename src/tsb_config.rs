//! The per-project copy configuration, `tsbconfig.json`.
//!
//! ```json
//! {
//!   "copyFiles": [
//!     { "files": ["src/templates/**/*.html"], "outDirectories": ["dist"], "up": 1 }
//!   ]
//! }
//! ```
//!
//! The schema is closed: unknown keys at either level are rejected while the
//! file is loaded, so nothing is copied or cleaned for a project whose
//! configuration is only partially valid.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use log::debug;
use serde::{
    de::{self, SeqAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::io::{read_json_from_file, FromFileError};

pub const CONFIG_FILE_NAME: &str = "tsbconfig.json";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CopyConfig {
    pub copy_files: Vec<CopyRule>,
}

/// One unit of copy work: which files, where to, and how many leading
/// directories to strip on the way.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CopyRule {
    /// Glob patterns relative to the project directory.
    pub files: Vec<String>,
    /// Destination directories relative to the project directory. Accepts a
    /// single string or a non-empty array.
    #[serde(deserialize_with = "one_or_more_directories")]
    pub out_directories: Vec<PathBuf>,
    #[serde(default)]
    pub up: u32,
    #[serde(default)]
    pub skip_clean: bool,
}

fn one_or_more_directories<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OutDirectories;

    impl<'de> Visitor<'de> for OutDirectories {
        type Value = Vec<PathBuf>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a directory or a non-empty array of directories")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(vec![PathBuf::from(value)])
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut directories = Vec::new();
            while let Some(directory) = seq.next_element::<String>()? {
                directories.push(PathBuf::from(directory));
            }
            if directories.is_empty() {
                return Err(de::Error::invalid_length(0, &self));
            }
            Ok(directories)
        }
    }

    deserializer.deserialize_any(OutDirectories)
}

impl CopyConfig {
    pub fn config_file(project_directory: &Path) -> PathBuf {
        project_directory.join(CONFIG_FILE_NAME)
    }

    /// Load the copy configuration of `project_directory`.
    ///
    /// A project without a `tsbconfig.json` has nothing to copy and yields
    /// `Ok(None)`.
    pub fn from_directory(project_directory: &Path) -> Result<Option<Self>, FromFileError> {
        let config_file = Self::config_file(project_directory);
        if !config_file.exists() {
            debug!("No {} in {:?}", CONFIG_FILE_NAME, project_directory);
            return Ok(None);
        }
        let config: Self = read_json_from_file(&config_file)?;
        debug!(
            "Loaded {} rule(s) from {:?}",
            config.copy_files.len(),
            config_file
        );
        Ok(Some(config))
    }
}
