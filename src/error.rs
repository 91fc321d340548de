use crate::{
    clean::CleanError,
    command::{CommandError, CommandErrorKind},
    copy::CopyError,
    io::FromFileError,
    plan::PlanError,
    tsconfig::{ResolveError, ResolveErrorKind, RootConfigError},
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] RootConfigError),

    #[error("Invalid copy configuration")]
    ConfigValidation {
        #[from]
        source: FromFileError,
    },

    #[error("Error resolving project references")]
    ReferenceGraph {
        #[from]
        source: ResolveError,
    },

    #[error("Error matching files to copy")]
    Plan {
        #[from]
        source: PlanError,
    },

    #[error("Error copying files")]
    Copy {
        #[from]
        source: CopyError,
    },

    #[error("Error cleaning output directories")]
    Clean {
        #[from]
        source: CleanError,
    },

    #[error("tsc compilation failed")]
    ExternalCommand {
        #[from]
        source: CommandError,
    },
}

impl Error {
    /// Process exit status: the compiler's own status when it failed with
    /// one, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        self.command_error()
            .and_then(CommandError::code)
            .filter(|code| *code != 0)
            .unwrap_or(1)
    }

    /// The failed child process, wherever it sits in the error.
    pub fn command_error(&self) -> Option<&CommandError> {
        match self {
            Self::ExternalCommand { source } => Some(source),
            Self::ReferenceGraph { source } => match source.kind() {
                ResolveErrorKind::ShowConfig(err) => Some(err),
                _ => None,
            },
            _ => None,
        }
    }

    /// Captured (stdout, stderr) of a child that ran and failed.
    pub fn captured_output(&self) -> Option<(&str, &str)> {
        match self.command_error()?.kind() {
            CommandErrorKind::ExitStatus { stdout, stderr, .. } => Some((stdout, stderr)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
