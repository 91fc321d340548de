//! Shared helpers for integration tests

#![allow(dead_code)]

use std::{
    collections::HashMap,
    error::Error,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use typescript_build::command::{CommandError, CommandRunner};

/// A scratch project directory that is removed on drop
pub struct Project {
    _temp: TempDir,
    pub path: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { _temp: temp, path }
    }

    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

/// Every message in an error's `source()` chain, joined with `: `
pub fn error_chain(err: &dyn Error) -> String {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(err) = source {
        messages.push(err.to_string());
        source = err.source();
    }
    messages.join(": ")
}

/// Answers `tsc --showConfig --project <config>` from a table and records
/// every invocation.
#[derive(Default)]
pub struct FakeTsc {
    effective_configs: HashMap<PathBuf, String>,
    pub build_output: String,
    pub calls: std::sync::Mutex<Vec<Vec<String>>>,
}

impl FakeTsc {
    pub fn with_config(mut self, config: impl AsRef<Path>, effective_config: &str) -> Self {
        self.effective_configs
            .insert(config.as_ref().to_owned(), effective_config.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeTsc {
    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        self.calls.lock().unwrap().push(args.to_vec());
        let command = format!("tsc {}", args.join(" "));
        if args.first().map(String::as_str) == Some("--build") {
            return Ok(self.build_output.clone());
        }
        let project = args
            .iter()
            .position(|arg| arg == "--project")
            .and_then(|index| args.get(index + 1))
            .map(PathBuf::from);
        match project.and_then(|project| self.effective_configs.get(&project)) {
            Some(effective_config) => Ok(effective_config.clone()),
            None => Err(CommandError::exit_status(
                command,
                Some(1),
                "",
                "error TS5058: The specified path does not exist",
            )),
        }
    }
}

/// A runner for code paths that must never reach the compiler
pub struct NoTsc;

impl CommandRunner for NoTsc {
    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        panic!("unexpected tsc invocation: {:?}", args);
    }
}
