//! Outpass status and staff decision types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Review state of an outpass.
///
/// `Pending` is the only non-terminal value; `Approved` and `Rejected` are
/// never left once reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutpassStatus {
    Pending,
    Approved,
    Rejected,
}

impl OutpassStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for OutpassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed as an [`OutpassStatus`].
#[derive(Debug, Error)]
#[error("unknown outpass status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for OutpassStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// A staff decision on a pending outpass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status the outpass lands in after this decision.
    pub fn target_status(self) -> OutpassStatus {
        match self {
            Self::Approve => OutpassStatus::Approved,
            Self::Reject => OutpassStatus::Rejected,
        }
    }
}
