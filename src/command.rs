//! Invoking the TypeScript compiler.
//!
//! How `tsc` is reached depends on the package manager of the surrounding
//! project, see [`ExecutionEnvironment`]. Everything that needs the compiler
//! goes through the [`CommandRunner`] trait so it can be replaced in tests.

use std::{fmt::Display, iter, path::Path, process::Command, string};

use log::{debug, trace};

use crate::find_up::find_directory_containing;

const COMPILER: &str = "tsc";

/// The mechanism used to invoke `tsc`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionEnvironment {
    /// `tsc` is on the `PATH`.
    Global,
    /// `yarn exec tsc`
    Yarn,
    /// `npm exec -- tsc`
    Npm,
}

impl ExecutionEnvironment {
    /// Inspect the lockfile next to the nearest `package.json` above
    /// `working_directory`.
    pub fn detect(working_directory: &Path) -> Self {
        let environment = match find_directory_containing(working_directory, "package.json") {
            Some(package_directory) if package_directory.join("yarn.lock").is_file() => Self::Yarn,
            Some(package_directory) if package_directory.join("package-lock.json").is_file() => {
                Self::Npm
            }
            Some(_) => Self::Global,
            None => {
                debug!("No package.json found above {:?}", working_directory);
                Self::Global
            }
        };
        debug!("Detected execution environment {:?}", environment);
        environment
    }

    /// The executable to spawn.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Global => COMPILER,
            Self::Yarn => "yarn",
            Self::Npm => "npm",
        }
    }

    /// The arguments passed to [`Self::program`] so that it runs `tsc` with `args`.
    pub fn arguments<S: AsRef<str>>(&self, args: &[S]) -> Vec<String> {
        let prefix: &[&str] = match self {
            Self::Global => &[],
            Self::Yarn => &["exec", COMPILER],
            Self::Npm => &["exec", "--", COMPILER],
        };
        prefix
            .iter()
            .copied()
            .chain(args.iter().map(AsRef::as_ref))
            .map(ToOwned::to_owned)
            .collect()
    }

    /// The full argument vector, program first.
    pub fn command_line<S: AsRef<str>>(&self, args: &[S]) -> Vec<String> {
        iter::once(self.program().to_owned())
            .chain(self.arguments(args))
            .collect()
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct CommandError {
    command: String,
    kind: CommandErrorKind,
}

impl CommandError {
    /// The rendered command line that failed.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn kind(&self) -> &CommandErrorKind {
        &self.kind
    }

    /// Exit code of the child, when it ran and reported one.
    pub fn code(&self) -> Option<i32> {
        match &self.kind {
            CommandErrorKind::ExitStatus { code, .. } => *code,
            _ => None,
        }
    }

    pub fn exit_status(
        command: impl Into<String>,
        code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self {
            command: command.into(),
            kind: CommandErrorKind::ExitStatus {
                code,
                stdout: stdout.into(),
                stderr: stderr.into(),
            },
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            CommandErrorKind::Spawn(_) => {
                write!(f, "unable to spawn child process for command {:?}", self.command)
            }
            CommandErrorKind::ExitStatus { code: Some(code), .. } => write!(
                f,
                "error running command {:?}: exited with status code {}",
                self.command, code
            ),
            CommandErrorKind::ExitStatus { code: None, .. } => write!(
                f,
                "error running command {:?}: terminated by signal",
                self.command
            ),
            CommandErrorKind::InvalidUtf8(_) => write!(
                f,
                "output of command {:?} included invalid UTF-8",
                self.command
            ),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            CommandErrorKind::Spawn(err) => Some(err),
            CommandErrorKind::ExitStatus { .. } => None,
            CommandErrorKind::InvalidUtf8(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum CommandErrorKind {
    #[non_exhaustive]
    Spawn(std::io::Error),
    #[non_exhaustive]
    ExitStatus {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[non_exhaustive]
    InvalidUtf8(string::FromUtf8Error),
}

/// Runs the TypeScript compiler with an argument list and returns its
/// captured standard output.
pub trait CommandRunner {
    fn run(&self, args: &[String]) -> Result<String, CommandError>;
}

/// Spawns `tsc` as a child process in the given [`ExecutionEnvironment`].
#[derive(Clone, Copy, Debug)]
pub struct TscRunner {
    environment: ExecutionEnvironment,
}

impl TscRunner {
    pub fn new(environment: ExecutionEnvironment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> ExecutionEnvironment {
        self.environment
    }
}

impl CommandRunner for TscRunner {
    fn run(&self, args: &[String]) -> Result<String, CommandError> {
        let program = self.environment.program();
        let program_args = self.environment.arguments(args);
        let command = self.environment.command_line(args).join(" ");
        debug!("Executing '{}'", command);

        (|| {
            let child = Command::new(program)
                .args(&program_args)
                .output()
                .map_err(CommandErrorKind::Spawn)?;
            debug!("Exited with code {:?}", child.status.code());
            if !child.status.success() {
                return Err(CommandErrorKind::ExitStatus {
                    code: child.status.code(),
                    stdout: String::from_utf8_lossy(&child.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&child.stderr).into_owned(),
                });
            }
            let stdout = String::from_utf8(child.stdout).map_err(CommandErrorKind::InvalidUtf8)?;
            trace!("stdout: {}", stdout);
            Ok(stdout)
        })()
        .map_err(|kind| CommandError { command, kind })
    }
}
