//! Tri-state monitoring verdict.

use serde::{Deserialize, Serialize};

/// Outcome of classifying a sample against a threshold rule.
///
/// Variants are declared in increasing severity so `Ord` ranks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Ok,
    Warn,
    Crit,
}

impl Verdict {
    /// The most severe verdict in `verdicts`, or `Ok` when there are none.
    pub fn worst<I>(verdicts: I) -> Verdict
    where
        I: IntoIterator<Item = Verdict>,
    {
        verdicts.into_iter().max().unwrap_or(Verdict::Ok)
    }

    /// Check_MK service state number (0 = OK, 1 = WARN, 2 = CRIT).
    pub fn state_code(self) -> u8 {
        match self {
            Verdict::Ok => 0,
            Verdict::Warn => 1,
            Verdict::Crit => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Warn => "WARN",
            Verdict::Crit => "CRIT",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
