//! Configuration options for text normalization

use std::fmt;
use std::str::FromStr;

/// Errors raised while reading normalization options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("Unknown line separator: {0:?} (expected \"lf\" or \"crlf\")")]
    UnknownLineSeparator(String),
}

/// Line terminator substituted for line breaks and block separators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSeparator {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineSeparator {
    /// The separator of the platform we are compiled for
    pub const fn platform() -> Self {
        if cfg!(windows) {
            LineSeparator::CrLf
        } else {
            LineSeparator::Lf
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::CrLf => "\r\n",
        }
    }
}

impl Default for LineSeparator {
    fn default() -> Self {
        Self::platform()
    }
}

impl fmt::Display for LineSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSeparator::Lf => f.write_str("lf"),
            LineSeparator::CrLf => f.write_str("crlf"),
        }
    }
}

impl FromStr for LineSeparator {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "\n" => return Ok(LineSeparator::Lf),
            "\r\n" => return Ok(LineSeparator::CrLf),
            _ => {}
        }

        match s.trim().to_ascii_lowercase().as_str() {
            "lf" | "unix" => Ok(LineSeparator::Lf),
            "crlf" | "windows" => Ok(LineSeparator::CrLf),
            _ => Err(OptionsError::UnknownLineSeparator(s.to_string())),
        }
    }
}
