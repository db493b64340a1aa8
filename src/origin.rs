//! Where a workbook comes from: a local path or a remote URL.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::OpenError;

/// A parsed source location. Dispatched once, when the handle is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Local(PathBuf),
    Remote(Url),
}

impl Origin {
    /// Parse an origin string without a files root.
    pub fn parse(origin: &str) -> Result<Self, OpenError> {
        Self::resolve(origin, None)
    }

    /// Parse an origin string, resolving relative local paths against
    /// `files_root` when given.
    ///
    /// `http`/`https` URLs are remote, `file` URLs are local, any other
    /// `scheme://` is rejected. Everything else is a filesystem path.
    pub fn resolve(origin: &str, files_root: Option<&Path>) -> Result<Self, OpenError> {
        let trimmed = origin.trim();
        if trimmed.is_empty() {
            return Err(OpenError::UnsupportedOrigin("empty origin".to_string()));
        }

        if trimmed.contains("://") {
            let url = Url::parse(trimmed)
                .map_err(|e| OpenError::UnsupportedOrigin(format!("{trimmed}: {e}")))?;
            return match url.scheme() {
                "http" | "https" => Ok(Self::Remote(url)),
                "file" => url
                    .to_file_path()
                    .map(Self::Local)
                    .map_err(|()| OpenError::UnsupportedOrigin(trimmed.to_string())),
                other => Err(OpenError::UnsupportedOrigin(format!(
                    "{trimmed}: scheme '{other}' is not supported"
                ))),
            };
        }

        let path = PathBuf::from(trimmed);
        if path.is_relative() {
            if let Some(root) = files_root {
                return Ok(Self::Local(root.join(path)));
            }
        }
        Ok(Self::Local(path))
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Lower-cased file extension of the path or URL path, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        match self {
            Self::Local(path) => extension_of(path),
            Self::Remote(url) => url
                .path_segments()
                .and_then(Iterator::last)
                .and_then(|last| extension_of(Path::new(last))),
        }
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => write!(f, "{url}"),
        }
    }
}

impl std::str::FromStr for Origin {
    type Err = OpenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
