//! True name / display name pairs shared by systems and planets.

use serde::{Deserialize, Serialize};

/// The unique key of an entity plus its optional user-facing name.
///
/// The display name falls back to the true name when absent, and a display
/// name equal to the true name is stored as absent, so both cases save the
/// same way.
///
/// ```rust
/// use skyfile::EntityName;
///
/// let mut name = EntityName::new("Sol");
/// assert_eq!(name.display_name(), "Sol");
///
/// name.set_display_name("Home");
/// assert!(name.has_display_name());
///
/// name.set_display_name("Sol");
/// assert!(!name.has_display_name());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityName {
    true_name: String,
    display_name: Option<String>,
}

impl EntityName {
    #[must_use]
    pub fn new(true_name: impl Into<String>) -> Self {
        EntityName {
            true_name: true_name.into(),
            display_name: None,
        }
    }

    #[must_use]
    pub fn true_name(&self) -> &str {
        &self.true_name
    }

    #[must_use]
    pub fn has_display_name(&self) -> bool {
        self.display_name.is_some()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.true_name)
    }

    /// Changes the key. A display name that now matches it is dropped.
    pub fn set_true_name(&mut self, name: impl Into<String>) {
        self.true_name = name.into();
        if self.display_name.as_deref() == Some(self.true_name.as_str()) {
            self.display_name = None;
        }
    }

    /// Sets the display name; an empty name or the true name clears it.
    pub fn set_display_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.display_name = if name.is_empty() || name == self.true_name {
            None
        } else {
            Some(name)
        };
    }

    pub fn clear_display_name(&mut self) {
        self.display_name = None;
    }
}
