use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ARKAIOS: No active editor")]
    NoActiveEditor,
    #[error("ARKAIOS: Select some code first")]
    EmptySelection,
    #[error("malformed view message: {0}")]
    Protocol(#[source] serde_json::Error),
    #[error("invalid assistant config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("worktree error: {0}")]
    Worktree(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
}

impl Error {
    /// Errors that the command boundary turns into a warning notification.
    pub fn is_user_warning(&self) -> bool {
        matches!(self, Error::NoActiveEditor | Error::EmptySelection)
    }
}

impl From<Error> for String {
    fn from(error: Error) -> Self {
        error.to_string()
    }
}
