//! Error types for settings persistence.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Settings load/save error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform has no configuration directory.
    #[error("設定ディレクトリが見つかりません")]
    NoConfigDir,

    /// Reading or writing the settings file failed.
    #[error("設定ファイルの入出力に失敗しました ({path}): {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is not valid JSON for `Settings`.
    #[error("設定ファイルの解析に失敗しました ({path}): {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The settings were parsed but contain out-of-range values.
    #[error("設定値が不正です: {0}")]
    Invalid(String),
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
