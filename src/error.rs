use thiserror::Error;

/// Failure classes a command run can end in. None of them is fatal to the shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caught before dispatch: missing parameter, missing env var, unsupported mode.
    Parameter,
    /// The process or the remote endpoint failed.
    Dispatch,
    /// The output was not a valid page.
    Protocol,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("missing required parameter: {0}")]
    MissingParam(String),

    #[error("missing env variable: {0}")]
    MissingEnv(String),

    #[error("command not found: {0}")]
    UnknownCommand(String),

    #[error("command {0} has nothing to execute")]
    MissingExec(String),

    #[error("interactive commands are not supported for remote extensions")]
    InteractiveRemote,

    #[error("command failed with exit code {code}, error:\n{stderr}")]
    Exit { code: i32, stderr: String },

    #[error("command failed with status {0}")]
    Status(String),

    #[error("{context}: {message}")]
    Transport { context: String, message: String },

    #[error("invalid page: {0}")]
    Protocol(String),
}

impl RunError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RunError::MissingParam(_)
            | RunError::MissingEnv(_)
            | RunError::UnknownCommand(_)
            | RunError::MissingExec(_)
            | RunError::InteractiveRemote => ErrorClass::Parameter,
            RunError::Exit { .. } | RunError::Status(_) | RunError::Transport { .. } => {
                ErrorClass::Dispatch
            }
            RunError::Protocol(_) => ErrorClass::Protocol,
        }
    }

    pub(crate) fn transport(context: &str, err: impl std::fmt::Display) -> Self {
        RunError::Transport {
            context: context.to_string(),
            message: err.to_string(),
        }
    }
}
