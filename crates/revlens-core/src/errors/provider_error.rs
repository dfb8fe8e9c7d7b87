/// Scoring/embedding provider errors.
///
/// Transient errors are retried by the adapter; permanent errors degrade the entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("transient provider failure ({provider}): {reason}")]
    Transient { provider: String, reason: String },

    #[error("permanent provider failure ({provider}): {reason}")]
    Permanent { provider: String, reason: String },
}

impl ProviderError {
    pub fn transient(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transient {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn permanent(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Permanent {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Transient { reason, .. } | Self::Permanent { reason, .. } => reason,
        }
    }
}
