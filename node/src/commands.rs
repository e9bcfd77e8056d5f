//! Slash-command parsing.

use court_types::{InboundMessage, VoteKind};

/// A recognised bot command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Rules,
    /// `/records [user]`
    Records(Option<String>),
    /// `/vote`, `/warn`, `/pardon` with their target, if one was given.
    Nominate {
        kind: VoteKind,
        target: Option<String>,
    },
    /// `/agree` or `/reject`
    Ballot { agree: bool },
    Status,
}

impl Command {
    /// Parse the message's command token. `/vote@court_bot` is treated as
    /// `/vote`. Returns `None` for plain text and unknown commands.
    pub fn parse(msg: &InboundMessage) -> Option<Self> {
        if !msg.is_command() {
            return None;
        }
        let token = msg.command();
        let name = token.split_once('@').map_or(token, |(name, _)| name);
        let first_arg = msg.args().first().map(|s| s.to_string());

        let command = match name {
            "/help" | "/start" => Self::Help,
            "/rules" => Self::Rules,
            "/records" => Self::Records(first_arg),
            "/vote" => Self::Nominate {
                kind: VoteKind::Bailan,
                target: first_arg,
            },
            "/warn" => Self::Nominate {
                kind: VoteKind::Warning,
                target: first_arg,
            },
            "/pardon" => Self::Nominate {
                kind: VoteKind::Pardon,
                target: first_arg,
            },
            "/agree" => Self::Ballot { agree: true },
            "/reject" => Self::Ballot { agree: false },
            "/status" => Self::Status,
            _ => return None,
        };
        Some(command)
    }

    /// Short name for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Rules => "rules",
            Self::Records(_) => "records",
            Self::Nominate { kind, .. } => match kind {
                VoteKind::Bailan => "vote",
                VoteKind::Warning => "warn",
                VoteKind::Pardon => "pardon",
            },
            Self::Ballot { agree: true } => "agree",
            Self::Ballot { agree: false } => "reject",
            Self::Status => "status",
        }
    }
}
