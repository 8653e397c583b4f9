//! Data-file writing.
//!
//! [`DataWriter`] is the inverse of [`crate::DataFile::parse`]: it renders
//! tokens line by line, nesting children one indentation unit deeper than
//! their parent.
//!
//! ## Overview
//!
//! - **Minimal quoting**: a token is quoted only when the parser would
//!   otherwise split or misread it
//! - **Quote choice**: `"` by default, backticks when the token contains `"`
//! - **Canonical numbers**: floating-point values are written with the
//!   shortest text that parses back to the same value
//!
//! ## Usage
//!
//! ```rust
//! use skyfile::{DataWriter, WriterOptions};
//!
//! let mut file = DataWriter::new(WriterOptions::default());
//! file.write(&[&"system", &"Alpha Centauri"]);
//! file.begin_child();
//! file.write(&[&"pos", &-12.5, &300.]);
//! file.end_child();
//!
//! assert_eq!(
//!     file.into_inner(),
//!     "system \"Alpha Centauri\"\n\tpos -12.5 300\n"
//! );
//! ```

use crate::{DataNode, WriterOptions};
use std::borrow::Cow;

/// Anything that can be written as a single token.
pub trait Token {
    fn to_token(&self) -> Cow<'_, str>;
}

impl Token for str {
    fn to_token(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl Token for String {
    fn to_token(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl<T: Token + ?Sized> Token for &T {
    fn to_token(&self) -> Cow<'_, str> {
        (**self).to_token()
    }
}

impl Token for f64 {
    fn to_token(&self) -> Cow<'_, str> {
        Cow::Owned(format_number(*self))
    }
}

impl Token for f32 {
    fn to_token(&self) -> Cow<'_, str> {
        Cow::Owned(format_number(f64::from(*self)))
    }
}

macro_rules! integer_token {
    ($($ty:ty),*) => {
        $(
            impl Token for $ty {
                fn to_token(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

integer_token!(i32, i64, u32, u64, usize);

/// Formats a number with the shortest decimal text that round-trips.
///
/// ```rust
/// use skyfile::format_number;
///
/// assert_eq!(format_number(500.), "500");
/// assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_number(-0.), "0");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0. {
        // Avoid writing "-0".
        return "0".to_string();
    }
    value.to_string()
}

/// Formats an orbital period in the short legacy form: 13 significant
/// digits, then the fractional part cut so the text is at most 7 characters.
///
/// ```rust
/// use skyfile::format_compact_period;
///
/// assert_eq!(format_compact_period(365.2563789), "365.256");
/// assert_eq!(format_compact_period(12345678.25), "12345678");
/// assert_eq!(format_compact_period(10.), "10");
/// ```
#[must_use]
pub fn format_compact_period(value: f64) -> String {
    let rounded = format!("{:.12e}", value)
        .parse::<f64>()
        .unwrap_or(value);
    let mut text = format_number(rounded);
    if let Some(dot) = text.find('.') {
        text.truncate(dot.max(7));
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

/// Returns the quote character a token must be wrapped in, if any.
fn quote_for(token: &str) -> Option<char> {
    let has_quote = token.contains('"');
    let needs_quotes = token.is_empty()
        || has_quote
        || token.starts_with('`')
        || token.starts_with('#')
        || token.chars().any(char::is_whitespace);
    if !needs_quotes {
        None
    } else if has_quote {
        Some('`')
    } else {
        Some('"')
    }
}

/// Renders nodes and token lines as indented text.
pub struct DataWriter {
    output: String,
    options: WriterOptions,
    depth: usize,
    line_open: bool,
}

impl DataWriter {
    pub fn new(options: WriterOptions) -> Self {
        DataWriter {
            output: String::with_capacity(256),
            options,
            depth: 0,
            line_open: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Appends one token to the current line, quoting it if needed.
    pub fn write_token<T: Token + ?Sized>(&mut self, token: &T) {
        let text = token.to_token();
        if self.line_open {
            self.output.push(' ');
        } else {
            for _ in 0..self.depth {
                self.output.push_str(self.options.indent.as_str());
            }
            self.line_open = true;
        }
        match quote_for(&text) {
            Some(quote) => {
                self.output.push(quote);
                self.output.push_str(&text);
                self.output.push(quote);
            }
            None => self.output.push_str(&text),
        }
    }

    /// Terminates the current line. Does nothing if no token was written.
    pub fn end_line(&mut self) {
        if self.line_open {
            self.output.push('\n');
            self.line_open = false;
        }
    }

    /// Writes a complete line.
    pub fn write(&mut self, tokens: &[&dyn Token]) {
        for token in tokens {
            self.write_token(*token);
        }
        self.end_line();
    }

    /// Writes a node and its whole subtree at the current depth.
    ///
    /// Nodes without tokens are skipped together with their children.
    pub fn write_node(&mut self, node: &DataNode) {
        if node.is_empty() {
            return;
        }
        for token in node.tokens() {
            self.write_token(token);
        }
        self.end_line();
        if node.has_children() {
            self.begin_child();
            for child in node {
                self.write_node(child);
            }
            self.end_child();
        }
    }

    /// Following lines are nested one level deeper.
    pub fn begin_child(&mut self) {
        self.end_line();
        self.depth += 1;
    }

    pub fn end_child(&mut self) {
        self.end_line();
        self.depth = self.depth.saturating_sub(1);
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_inner(mut self) -> String {
        self.end_line();
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{node, DataFile, Indent};

    #[test]
    fn test_quoting_rules() {
        assert_eq!(quote_for("plain"), None);
        assert_eq!(quote_for("two words"), Some('"'));
        assert_eq!(quote_for(""), Some('"'));
        assert_eq!(quote_for("say \"hi\""), Some('`'));
        assert_eq!(quote_for("a\"b"), Some('`'));
        assert_eq!(quote_for("#tag"), Some('"'));
        assert_eq!(quote_for("`tick"), Some('"'));
    }

    #[test]
    fn test_nested_node_output() {
        let tree = node!["arrival"; node!["link", 500], node!["jump", 300]];
        let mut file = DataWriter::new(WriterOptions::default());
        file.write_node(&tree);
        assert_eq!(file.into_inner(), "arrival\n\tlink 500\n\tjump 300\n");
    }

    #[test]
    fn test_empty_nodes_are_skipped() {
        let tree = node!["outer"; DataNode::default().with_child(node!["lost"]), node!["kept"]];
        let mut file = DataWriter::new(WriterOptions::default());
        file.write_node(&tree);
        assert_eq!(file.into_inner(), "outer\n\tkept\n");
    }

    #[test]
    fn test_space_indentation() {
        let tree = node!["a"; node!["b"; node!["c"]]];
        let mut file = DataWriter::new(WriterOptions::new().with_indent(Indent::Spaces(2)));
        file.write_node(&tree);
        let text = file.into_inner();
        assert_eq!(text, "a\n  b\n    c\n");
        assert_eq!(DataFile::parse(&text).root().children()[0], tree);
    }

    #[test]
    fn test_compact_period_keeps_integer_part() {
        assert_eq!(format_compact_period(1234.56789), "1234.56");
        assert_eq!(format_compact_period(0.000123456), "0.00012");
        assert_eq!(format_compact_period(999999.9), "999999");
    }
}
