//! The kinds of nomination a vote can be about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a vote decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    /// The base penalty ("being ridiculous"), +1 bailan on pass.
    Bailan,
    /// A lesser penalty; a second pending warning converts into a bailan.
    Warning,
    /// Forgiveness, -1 bailan on pass.
    Pardon,
}

impl VoteKind {
    /// Machine name, as used in logs and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bailan => "bailan",
            Self::Warning => "warning",
            Self::Pardon => "pardon",
        }
    }

    /// Label shown to the group.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bailan => "白爛",
            Self::Warning => "醜一",
            Self::Pardon => "赦免",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
