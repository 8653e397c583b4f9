//! Data-file parsing.
//!
//! This module turns indented text into a tree of [`DataNode`]s.
//!
//! ## Overview
//!
//! - **Line-oriented**: every non-blank, non-comment line becomes one node
//! - **Indentation nesting**: a line indented deeper than the line before it is
//!   that line's child; equal indentation makes a sibling
//! - **Quoting**: `"..."` groups words into one token, `` `...` `` does the same
//!   for text that itself contains `"`
//! - **Permissive**: nothing is rejected; odd indentation is resolved by raw
//!   width comparison and unterminated quotes run to the end of the line
//!
//! ## Usage
//!
//! ```rust
//! use skyfile::DataFile;
//!
//! let file = DataFile::parse("# the home system\nsystem Sol\n\tpos 0 0\n");
//! let system = file.iter().next().unwrap();
//! assert_eq!(system.token(1), "Sol");
//! assert_eq!(system.children()[0].keyword(), "pos");
//! assert_eq!(file.comments(), "# the home system\n");
//! ```

use crate::DataNode;
use tracing::trace;

/// A parsed data file: a synthetic root whose children are the top-level
/// nodes, plus every comment line that was stripped out.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataFile {
    root: DataNode,
    comments: String,
}

/// A node under construction together with the indentation of its line.
/// The root has no indentation, which orders below every real line.
struct Frame {
    indent: Option<usize>,
    node: DataNode,
}

impl DataFile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a whole file.
    ///
    /// An input with no nodes yields an empty file rather than an error.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut comments = String::new();
        let mut stack = vec![Frame {
            indent: None,
            node: DataNode::default(),
        }];
        let mut count = 0usize;

        for raw in input.lines() {
            let line = raw.strip_prefix('\u{feff}').unwrap_or(raw);
            let width = indent_width(line);
            let text = &line[width..];
            if text.trim().is_empty() {
                continue;
            }
            if text.starts_with('#') {
                comments.push_str(line);
                comments.push('\n');
                continue;
            }

            let tokens = tokenize(text);
            if tokens.is_empty() {
                continue;
            }

            // Close every open node that is not strictly shallower than this line.
            while stack.last().is_some_and(|top| top.indent >= Some(width)) {
                fold_top(&mut stack);
            }
            stack.push(Frame {
                indent: Some(width),
                node: DataNode::new(tokens),
            });
            count += 1;
        }
        while stack.len() > 1 {
            fold_top(&mut stack);
        }

        let root = stack.pop().map(|frame| frame.node).unwrap_or_default();
        trace!(
            nodes = count,
            top_level = root.children().len(),
            comment_bytes = comments.len(),
            "parsed data file"
        );
        DataFile { root, comments }
    }

    /// Wraps already-built top-level nodes.
    #[must_use]
    pub fn from_nodes(nodes: Vec<DataNode>) -> Self {
        let mut root = DataNode::default();
        *root.children_mut() = nodes;
        DataFile {
            root,
            comments: String::new(),
        }
    }

    /// The synthetic root; its children are the top-level nodes.
    #[must_use]
    pub fn root(&self) -> &DataNode {
        &self.root
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataNode> {
        self.root.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.root.has_children()
    }

    /// All comment lines stripped while reading, each followed by a newline.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<DataNode> {
        let DataFile { mut root, .. } = self;
        std::mem::take(root.children_mut())
    }
}

impl<'a> IntoIterator for &'a DataFile {
    type Item = &'a DataNode;
    type IntoIter = std::slice::Iter<'a, DataNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn fold_top(stack: &mut Vec<Frame>) {
    if stack.len() < 2 {
        return;
    }
    if let Some(frame) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.node.push_child(frame.node);
        }
    }
}

/// Counts leading tabs and spaces; each counts as one column.
fn indent_width(line: &str) -> usize {
    line.bytes()
        .take_while(|byte| *byte == b' ' || *byte == b'\t')
        .count()
}

/// Splits one line of text into tokens.
///
/// ```rust
/// use skyfile::tokenize;
///
/// assert_eq!(
///     tokenize(r#"display name "New Boston" `say "hi"`"#),
///     vec!["display", "name", "New Boston", r#"say "hi""#]
/// );
/// ```
#[must_use]
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '"' || ch == '`' {
            chars.next();
            let body = start + ch.len_utf8();
            let mut end = line.len();
            for (i, c) in chars.by_ref() {
                if c == ch {
                    end = i;
                    break;
                }
            }
            tokens.push(line[body..end].to_string());
        } else {
            let mut end = line.len();
            while let Some(&(i, c)) = chars.peek() {
                if c.is_whitespace() {
                    end = i;
                    break;
                }
                chars.next();
            }
            tokens.push(line[start..end].to_string());
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let file = DataFile::parse("");
        assert!(file.is_empty());
        assert_eq!(file.comments(), "");

        let file = DataFile::parse("\n   \n\t\n# only a comment\n");
        assert!(file.is_empty());
        assert_eq!(file.comments(), "# only a comment\n");
    }

    #[test]
    fn test_siblings_and_children() {
        let file = DataFile::parse("a\n\tb\n\tc\n\t\td\ne\n");
        let top: Vec<_> = file.iter().map(DataNode::keyword).collect();
        assert_eq!(top, vec!["a", "e"]);

        let a = &file.root().children()[0];
        assert_eq!(a.children().len(), 2);
        assert_eq!(a.children()[1].keyword(), "c");
        assert_eq!(a.children()[1].children()[0].keyword(), "d");
    }

    #[test]
    fn test_dedent_pops_to_matching_ancestor() {
        let file = DataFile::parse("a\n    b\n        c\n  d\n");
        let a = &file.root().children()[0];
        // "d" is shallower than "b" but deeper than "a", so it joins "a".
        let keys: Vec<_> = a.iter().map(DataNode::keyword).collect();
        assert_eq!(keys, vec!["b", "d"]);
    }

    #[test]
    fn test_indented_comment_is_stripped() {
        let file = DataFile::parse("system Sol\n\t# note\n\tpos 1 2\n");
        let sol = &file.root().children()[0];
        assert_eq!(sol.children().len(), 1);
        assert_eq!(file.comments(), "\t# note\n");
    }

    #[test]
    fn test_quoted_tokens() {
        assert_eq!(tokenize(r#""a b"  c"#), vec!["a b", "c"]);
        assert_eq!(tokenize("`He said \"no\"`"), vec!["He said \"no\""]);
        assert_eq!(tokenize(r#""""#), vec![""]);
        assert_eq!(tokenize(r#""unterminated text"#), vec!["unterminated text"]);
        assert_eq!(tokenize("a\t\tb"), vec!["a", "b"]);
    }

    #[test]
    fn test_hash_inside_line_is_a_token() {
        assert_eq!(tokenize("color #ff0000"), vec!["color", "#ff0000"]);
    }

    #[test]
    fn test_crlf_lines() {
        let file = DataFile::parse("system Sol\r\n\tpos 0 0\r\n");
        let sol = &file.root().children()[0];
        assert_eq!(sol.token(1), "Sol");
        assert_eq!(sol.children()[0].value(2), 0.);
    }
}
