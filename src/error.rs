use std::path::PathBuf;

use thiserror::Error;

/// One failed transfer tool invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{verb}: {diagnostic}")]
pub(crate) struct LinkError {
    pub(crate) verb: &'static str,
    pub(crate) diagnostic: String,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("can't find your remote device '{port}'")]
    Unreachable { port: String },
    #[error("{verb} failed: {diagnostic}")]
    RemoteCommandFailed {
        verb: &'static str,
        diagnostic: String,
    },
    #[error("{}: {source}", path.display())]
    LocalIoFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cancelled by user")]
    UserCancelled,
}

impl SessionError {
    pub(crate) fn local_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LocalIoFailed {
            path: path.into(),
            source,
        }
    }
}

impl From<LinkError> for SessionError {
    fn from(err: LinkError) -> Self {
        Self::RemoteCommandFailed {
            verb: err.verb,
            diagnostic: err.diagnostic,
        }
    }
}

pub(crate) type SessionResult<T> = Result<T, SessionError>;
