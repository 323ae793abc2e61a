//! Error Handling tools

use std::{
    fmt,
    io::Error as IoError,
    error::Error as StdError,
};

use crate::di;

/// Generic error
#[derive(Debug)]
pub enum Error {
    /// A component failed to resolve
    Di(di::error::Error),

    /// A configuration file could not be read
    Io(IoError),

    /// A configuration document could not be parsed
    Parse(Box<dyn StdError + Send + Sync>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Di(err) => fmt::Display::fmt(err, f),
            Error::Io(err) => write!(f, "Configuration Error: {err}"),
            Error::Parse(err) => write!(f, "Configuration Error: {err}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Di(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Parse(err) => Some(err.as_ref()),
        }
    }
}

impl From<IoError> for Error {
    #[inline]
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    #[inline]
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.into())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for Error {
    #[inline]
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl Error {
    /// Returns the DI error if the failure happened while resolving components
    #[inline]
    pub fn as_di(&self) -> Option<&di::error::Error> {
        match self {
            Error::Di(err) => Some(err),
            _ => None,
        }
    }
}
