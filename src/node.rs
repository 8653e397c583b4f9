//! The node tree produced by the parser and consumed by the writer.
//!
//! A [`DataNode`] is one line of a data file: an ordered list of string tokens
//! plus the nodes indented beneath it. Tokens are kept as text; numeric
//! interpretation happens on demand through [`DataNode::value`].
//!
//! ```rust
//! use skyfile::{node, DataNode};
//!
//! let pos = node!["pos", 12.5, -40];
//! assert_eq!(pos.keyword(), "pos");
//! assert_eq!(pos.value(1), 12.5);
//! assert_eq!(pos.value(2), -40.);
//! assert_eq!(pos.value(7), 0.);
//! ```

use serde::{Deserialize, Serialize};

/// One line of a data file and everything nested under it.
///
/// Children are kept in file order. A node with no tokens carries no meaning
/// and is skipped by [`crate::DataWriter`].
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct DataNode {
    tokens: Vec<String>,
    children: Vec<DataNode>,
}

/// Interprets a token as a number.
///
/// Anything that does not parse as a decimal floating-point value yields `0`.
///
/// ```rust
/// use skyfile::parse_number;
///
/// assert_eq!(parse_number("1e3"), 1000.);
/// assert_eq!(parse_number(" 7 "), 7.);
/// assert_eq!(parse_number("seven"), 0.);
/// ```
#[must_use]
pub fn parse_number(token: &str) -> f64 {
    token.trim().parse::<f64>().unwrap_or(0.)
}

/// Returns `true` if the token reads as a decimal number.
#[must_use]
pub fn is_number(token: &str) -> bool {
    token.trim().parse::<f64>().is_ok()
}

impl DataNode {
    #[must_use]
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataNode {
            tokens: tokens.into_iter().map(Into::into).collect(),
            children: Vec::new(),
        }
    }

    /// Builder-style variant of [`DataNode::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: DataNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of tokens on this line.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token at `index`, or `""` past the end.
    #[must_use]
    pub fn token(&self, index: usize) -> &str {
        self.tokens.get(index).map_or("", String::as_str)
    }

    /// The first token, which entity loaders dispatch on.
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &str {
        self.token(0)
    }

    /// The token at `index` read as a number; `0` when missing or not numeric.
    #[must_use]
    pub fn value(&self, index: usize) -> f64 {
        self.tokens.get(index).map_or(0., |token| parse_number(token))
    }

    #[must_use]
    pub fn is_number(&self, index: usize) -> bool {
        self.tokens.get(index).is_some_and(|token| is_number(token))
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[must_use]
    pub fn children(&self) -> &[DataNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<DataNode> {
        &mut self.children
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataNode> {
        self.children.iter()
    }

    pub fn push_token(&mut self, token: impl Into<String>) {
        self.tokens.push(token.into());
    }

    pub fn push_child(&mut self, child: DataNode) {
        self.children.push(child);
    }
}

impl<'a> IntoIterator for &'a DataNode {
    type Item = &'a DataNode;
    type IntoIter = std::slice::Iter<'a, DataNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}
