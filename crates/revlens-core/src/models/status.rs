use serde::{Deserialize, Serialize};

/// How an index entry came to hold its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Scored by the provider.
    Scored,
    /// Permanent provider failure; holds the safe default value.
    Degraded,
    /// Transient failure after retries; holds the default value and is skipped
    /// by queries until a retry succeeds.
    Pending,
}

impl EntryStatus {
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Scored => 0,
            Self::Degraded => 1,
            Self::Pending => 2,
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Scored),
            1 => Some(Self::Degraded),
            2 => Some(Self::Pending),
            _ => None,
        }
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }
}
