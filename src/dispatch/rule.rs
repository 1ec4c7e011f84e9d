//! Keyword match rules.

use std::str::FromStr;

use crate::error::RuleError;

/// Where in the message text the keyword must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Text starts with the keyword.
    Prefix,
    /// Text equals the keyword.
    Exact,
    /// Text ends with the keyword.
    Suffix,
    /// Keyword occurs anywhere in the text.
    Contains,
}

impl FromStr for MatchMode {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(Self::Prefix),
            "exact" => Ok(Self::Exact),
            "suffix" => Ok(Self::Suffix),
            "contains" => Ok(Self::Contains),
            other => Err(RuleError::UnknownMode(other.to_string())),
        }
    }
}

/// A keyword plus the position it must match at.
///
/// Matching lowercases the message text, not the keyword; callers are
/// expected to hand in lowercase keywords (`Command::new` does this).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRule {
    keyword: String,
    mode: MatchMode,
}

impl MatchRule {
    pub fn new(keyword: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            keyword: keyword.into(),
            mode,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether this rule matches `text`. Pure; no side effects.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        match self.mode {
            MatchMode::Prefix => text.starts_with(&self.keyword),
            MatchMode::Exact => text == self.keyword,
            MatchMode::Suffix => text.ends_with(&self.keyword),
            MatchMode::Contains => text.contains(&self.keyword),
        }
    }
}
