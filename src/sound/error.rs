//! Alarm sound error types.

use thiserror::Error;

/// Errors that can occur while playing the alarm.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("サウンドファイルが見つかりません: {0}")]
    FileNotFound(String),

    /// Failed to decode the audio file.
    #[error("サウンドファイルのデコードに失敗しました: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("オーディオストリームの作成に失敗しました: {0}")]
    StreamError(String),

    /// Generic playback error.
    #[error("サウンド再生エラー: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Hint logged next to the error when the alarm degrades.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "オーディオデバイスを接続してください",
            Self::FileNotFound(_) => "設定のalarm_soundのパスを確認してください",
            Self::DecodeError(_) => "サウンドファイルが破損している可能性があります",
            Self::StreamError(_) => "オーディオ設定を確認してください",
            Self::PlaybackError(_) => "アプリケーションを再起動してください",
        }
    }
}
