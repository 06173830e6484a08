use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One edge of an axis in logical terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Edge {
    /// The block-start or inline-start edge.
    Start,
    /// The block-end or inline-end edge.
    End,
}

impl Edge {
    /// The opposite edge.
    pub fn flip(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }

    /// The keyword used in corner strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl FromStr for Edge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            _ => Err(Error::Invalid(format!("unknown edge: {s:?}"))),
        }
    }
}

/// A logical corner of an anchor or surface: a block edge combined with an
/// inline edge. Written as `"<block>-<inline>"`, e.g. `"end-start"` is the
/// bottom-left corner in a left-to-right, top-to-bottom layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Corner {
    /// Block-axis edge.
    pub block: Edge,
    /// Inline-axis edge.
    pub inline: Edge,
}

impl Corner {
    /// Block start, inline start.
    pub const START_START: Self = Self::new(Edge::Start, Edge::Start);
    /// Block start, inline end.
    pub const START_END: Self = Self::new(Edge::Start, Edge::End);
    /// Block end, inline start.
    pub const END_START: Self = Self::new(Edge::End, Edge::Start);
    /// Block end, inline end.
    pub const END_END: Self = Self::new(Edge::End, Edge::End);

    /// All four corners.
    pub const ALL: [Self; 4] = [
        Self::START_START,
        Self::START_END,
        Self::END_START,
        Self::END_END,
    ];

    /// Construct a corner from its edges.
    pub const fn new(block: Edge, inline: Edge) -> Self {
        Self { block, inline }
    }
}

impl FromStr for Corner {
    type Err = Error;

    /// Parsing ignores case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let norm = s.trim().to_ascii_lowercase();
        let mut parts = norm.split('-');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(b), Some(i), None) => Ok(Self::new(b.parse()?, i.parse()?)),
            _ => Err(Error::Invalid(format!("unknown corner: {s:?}"))),
        }
    }
}

impl TryFrom<String> for Corner {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Corner> for String {
    fn from(c: Corner) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.block.as_str(), self.inline.as_str())
    }
}
