//! Engine configuration.
//!
//! Defaults are usable as-is; [`EngineConfig::from_env`] layers the
//! environment on top of them.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Directory that relative local paths are resolved against.
pub const ENV_FILES_ROOT: &str = "EXCEL_FILES_PATH";
/// Remote fetch timeout, in whole seconds.
pub const ENV_HTTP_TIMEOUT_SECS: &str = "XLCHUNK_HTTP_TIMEOUT_SECS";
/// Optional ceiling on remote download size, in bytes.
pub const ENV_MAX_DOWNLOAD_BYTES: &str = "XLCHUNK_MAX_DOWNLOAD_BYTES";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings shared by every operation of an [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base directory for relative local paths. `None` means the working
    /// directory.
    pub files_root: Option<PathBuf>,
    /// Timeout for the whole remote GET.
    pub http_timeout: Duration,
    pub user_agent: String,
    /// Refuse remote payloads larger than this. `None` disables the check.
    pub max_download_bytes: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            files_root: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            user_agent: format!("xlchunk/{}", env!("CARGO_PKG_VERSION")),
            max_download_bytes: None,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `EXCEL_FILES_PATH`,
    /// `XLCHUNK_HTTP_TIMEOUT_SECS` and `XLCHUNK_MAX_DOWNLOAD_BYTES`.
    ///
    /// Unparsable numeric values are logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(root) = lookup(ENV_FILES_ROOT).filter(|s| !s.trim().is_empty()) {
            config.files_root = Some(PathBuf::from(root));
        }
        if let Some(secs) = parse_u64_var(&lookup, ENV_HTTP_TIMEOUT_SECS) {
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_u64_var(&lookup, ENV_MAX_DOWNLOAD_BYTES) {
            config.max_download_bytes = Some(limit);
        }

        config
    }

    #[must_use]
    pub fn with_files_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.files_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_download_bytes(mut self, limit: u64) -> Self {
        self.max_download_bytes = Some(limit);
        self
    }
}

fn parse_u64_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring non-numeric environment value");
            None
        }
    }
}
