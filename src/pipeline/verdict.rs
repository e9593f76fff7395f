use std::fmt;

use serde::Serialize;

pub const APPROVE_MARKER: &str = "VERDICT: APPROVE";
pub const REQUEST_CHANGES_MARKER: &str = "VERDICT: REQUEST_CHANGES";

/// Action derived from the Manager's final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Approve,
    RequestChanges,
    Comment,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Approve => "APPROVE",
            Verdict::RequestChanges => "REQUEST_CHANGES",
            Verdict::Comment => "COMMENT",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map review text to a verdict by marker presence. The approve marker is
/// checked first, so text carrying both markers classifies as `Approve`.
pub fn classify(text: &str) -> Verdict {
    if text.contains(APPROVE_MARKER) {
        Verdict::Approve
    } else if text.contains(REQUEST_CHANGES_MARKER) {
        Verdict::RequestChanges
    } else {
        Verdict::Comment
    }
}

/// Whether the text carries either verdict marker.
pub fn has_marker(text: &str) -> bool {
    text.contains(APPROVE_MARKER) || text.contains(REQUEST_CHANGES_MARKER)
}
