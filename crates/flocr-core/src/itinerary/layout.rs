//! Layout classification: which parsing strategy applies to a text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::rules::patterns::{COLUMN_HEADER, LAYOVER_KEYWORD, ROUTE_HEADER};

/// Structural layout of a screenshot's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    /// One flight per line, optionally delimited into columns.
    Tabular,
    /// Flights as multi-line blocks, each introduced by its flight number.
    Block,
    /// Detail view: "AAA-BBB # <flight>" headers followed by field lines.
    Detail,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Tabular => "tabular",
            LayoutKind::Block => "block",
            LayoutKind::Detail => "detail",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tabular" | "table" => Ok(LayoutKind::Tabular),
            "block" => Ok(LayoutKind::Block),
            "detail" => Ok(LayoutKind::Detail),
            other => Err(format!("unknown layout: {}", other)),
        }
    }
}

/// Classify normalized text. First matching rule wins:
/// 1. a layover keyword → [`LayoutKind::Block`];
/// 2. a route header line ("DEL-BOM # 6E 2341") → [`LayoutKind::Detail`];
/// 3. column header keywords → [`LayoutKind::Tabular`];
/// 4. otherwise [`LayoutKind::Tabular`].
pub fn classify_layout(text: &str) -> LayoutKind {
    if LAYOVER_KEYWORD.is_match(text) {
        LayoutKind::Block
    } else if ROUTE_HEADER.is_match(text) {
        LayoutKind::Detail
    } else {
        if COLUMN_HEADER.is_match(text) {
            trace!("Column headers found, using tabular layout");
        } else {
            trace!("No layout markers found, defaulting to tabular layout");
        }
        LayoutKind::Tabular
    }
}
