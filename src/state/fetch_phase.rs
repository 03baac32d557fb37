/// Phase definitions for one paginated fetch operation
///
/// A fetch starts in `Init`, probes the total row count, then either ends
/// empty or fans out over every page. Any failure is terminal.
use std::fmt;

/// Represents the current phase of a paginated fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchPhase {
    // ===== Active Phases =====
    /// Nothing has been requested yet
    Init,

    /// The count probe is in flight
    Probing,

    /// The total row count is known
    Probed { page_count: u32 },

    /// All `pages` requests have been launched
    Fetching { pages: u32 },

    // ===== Terminal Phases =====
    /// Every page arrived and was gathered
    Done,

    /// The probe reported zero rows; no page was requested
    DoneEmpty,

    /// The probe or one of the page requests failed
    Failed,
}

impl FetchPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::DoneEmpty | Self::Failed)
    }

    /// Returns true if the phase ended with a usable result
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done | Self::DoneEmpty)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: &FetchPhase) -> bool {
        match (self, next) {
            (Self::Init, Self::Probing) => true,
            (Self::Probing, Self::Probed { .. }) | (Self::Probing, Self::Failed) => true,
            (Self::Probed { page_count: 0 }, Self::DoneEmpty) => true,
            (Self::Probed { page_count }, Self::Fetching { pages }) => {
                *page_count > 0 && pages == page_count
            }
            (Self::Fetching { .. }, Self::Done) | (Self::Fetching { .. }, Self::Failed) => true,
            _ => false,
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Probing => "probing",
            Self::Probed { .. } => "probed",
            Self::Fetching { .. } => "fetching",
            Self::Done => "done",
            Self::DoneEmpty => "done_empty",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for FetchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probed { page_count } => write!(f, "probed({} pages)", page_count),
            Self::Fetching { pages } => write!(f, "fetching({} pages)", pages),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
