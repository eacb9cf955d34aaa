use crate::container::ContainerError;
use thiserror::Error;

/// Errors surfaced by the dispatch core.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("unknown command: {}", display_argv(.argv))]
    UnknownCommand { argv: Vec<String> },

    #[error("module '{module}' could not resolve its commands")]
    Resolution {
        module: String,
        #[source]
        source: ContainerError,
    },

    #[error("module '{0}' registered twice")]
    DuplicateModule(String),

    /// Raised by the invoked command itself; passed through untouched.
    #[error(transparent)]
    Command(#[from] anyhow::Error),
}

impl DispatchError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::UnknownCommand { .. } => 2,
            _ => 1,
        }
    }
}

fn display_argv(argv: &[String]) -> String {
    if argv.is_empty() {
        "(none)".to_string()
    } else {
        argv.join(" ")
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
