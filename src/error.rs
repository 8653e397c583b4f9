//! Error types for the data-file container and registries.
//!
//! Parsing and entity loading never fail: malformed lines degrade into default
//! values and passthrough nodes. The errors here come from the few operations
//! that can be refused outright.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading or writing a whole file through [`crate::from_reader`]
//!   or [`crate::to_writer`]
//! - **Name Collisions**: renaming or inserting an entity under a name that is
//!   already taken
//! - **Unknown Names**: renaming or linking an entity that is not registered
//!
//! ## Examples
//!
//! ```rust
//! use skyfile::{Error, MapData, System};
//!
//! let mut map = MapData::new();
//! map.insert_system(System::named("Sol")).unwrap();
//! map.insert_system(System::named("Alpha Centauri")).unwrap();
//!
//! let err = map.rename_system("Sol", "Alpha Centauri").unwrap_err();
//! assert!(matches!(err, Error::DuplicateName { .. }));
//! ```

use std::fmt;
use thiserror::Error;

/// Everything that can go wrong outside of the (infallible) parse/load path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The requested name is already used by another entity of the same kind.
    #[error("a {kind} named \"{name}\" already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// No entity of this kind is registered under the name.
    #[error("no {kind} named \"{name}\"")]
    UnknownName { kind: &'static str, name: String },

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a name-collision error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use skyfile::Error;
    ///
    /// let err = Error::duplicate_name("system", "Sol");
    /// assert!(err.to_string().contains("already exists"));
    /// ```
    pub fn duplicate_name(kind: &'static str, name: &str) -> Self {
        Error::DuplicateName {
            kind,
            name: name.to_string(),
        }
    }

    /// Creates an unknown-name error.
    pub fn unknown_name(kind: &'static str, name: &str) -> Self {
        Error::UnknownName {
            kind,
            name: name.to_string(),
        }
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for file reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
