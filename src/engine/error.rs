//! Error types for timer engine commands.

use thiserror::Error;

use crate::types::SessionMode;

/// Errors returned by engine commands.
///
/// Every error is local and recoverable: the command is rejected and the
/// timer state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Bad preset index or a non-positive duration.
    #[error("引数が不正です: {0}")]
    InvalidArgument(String),

    /// The command is not meaningful in the current mode.
    #[error("現在のモード({mode})では{command}を実行できません")]
    InvalidTransition {
        command: &'static str,
        mode: SessionMode,
    },
}

impl EngineError {
    /// Returns true for `InvalidArgument`.
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns true for `InvalidTransition`.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidTransition { .. })
    }
}
