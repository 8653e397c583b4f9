//! Configuration options for writing data files and generating systems.
//!
//! - [`WriterOptions`]: indentation unit and period formatting for [`crate::DataWriter`]
//! - [`Indent`]: choice of indentation unit (tab or spaces)
//! - [`GeneratorOptions`]: retry budget and target size for [`crate::System::randomize`]
//!
//! ## Examples
//!
//! ```rust
//! use skyfile::{Indent, WriterOptions};
//!
//! let options = WriterOptions::new()
//!     .with_indent(Indent::Spaces(4))
//!     .with_compact_periods(true);
//! assert_eq!(options.indent.as_str(), "    ");
//! ```

/// Indentation unit used for each level of nesting.
///
/// The parser accepts any mix of tabs and spaces, so this only affects
/// output.
///
/// # Examples
///
/// ```rust
/// use skyfile::Indent;
///
/// assert_eq!(Indent::Tab.as_str(), "\t");
/// assert_eq!(Indent::Spaces(2).as_str(), "  ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Indent {
    #[default]
    Tab,
    Spaces(usize),
}

impl Indent {
    /// Returns the text written once per nesting level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        const SPACES: &str = "                ";
        match self {
            Indent::Tab => "\t",
            Indent::Spaces(n) => &SPACES[..(*n).clamp(1, SPACES.len())],
        }
    }
}

/// Options for [`crate::DataWriter`].
#[derive(Clone, Debug, Default)]
pub struct WriterOptions {
    pub indent: Indent,
    /// Write orbital periods with the short legacy form (at most 7 characters
    /// once a fractional part is present) instead of full precision.
    pub compact_periods: bool,
}

impl WriterOptions {
    /// Creates default options (tab indentation, full-precision periods).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skyfile::{Indent, WriterOptions};
    ///
    /// let options = WriterOptions::new();
    /// assert_eq!(options.indent, Indent::Tab);
    /// assert!(!options.compact_periods);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation unit.
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Enables or disables the compact period format.
    #[must_use]
    pub fn with_compact_periods(mut self, compact: bool) -> Self {
        self.compact_periods = compact;
        self
    }
}

/// Options for whole-system generation.
#[derive(Clone, Debug)]
pub struct GeneratorOptions {
    /// How many candidate systems to try before settling for the last one.
    pub max_attempts: usize,
    /// Planets are added until the occupied radius reaches this distance.
    pub occupied_limit: f64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            max_attempts: 100,
            occupied_limit: 2000.,
        }
    }
}

impl GeneratorOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn with_occupied_limit(mut self, limit: f64) -> Self {
        self.occupied_limit = limit;
        self
    }
}
