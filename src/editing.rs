//! Index-based editing of entity lists.
//!
//! Editors usually show a list as a table with one extra blank row at the
//! end. Typing into that row adds an entry, clearing an existing row removes
//! it, and anything else edits the entry in place. [`EntryList`] provides the
//! three primitive operations plus [`EntryList::apply_row_edit`], which maps a
//! row edit onto them.
//!
//! ```rust
//! use skyfile::{EditOutcome, EntryList, PeriodicEvent, PeriodicField};
//!
//! let mut fleets: Vec<PeriodicEvent> = Vec::new();
//!
//! // The blank row sits at index `len()`.
//! let outcome = fleets.apply_row_edit(0, PeriodicField::Name, "Small Pirates");
//! assert_eq!(outcome, EditOutcome::Appended(0));
//! fleets.apply_row_edit(0, PeriodicField::Period, "800");
//! assert_eq!(fleets[0].period, 800);
//!
//! fleets.apply_row_edit(0, PeriodicField::Name, "");
//! fleets.apply_row_edit(0, PeriodicField::Period, "");
//! assert!(fleets.is_empty());
//! ```

use crate::node::parse_number;
use serde::{Deserialize, Serialize};

/// A record that can be edited one field at a time from text.
pub trait Entry: Default {
    type Field: Copy;

    /// Stores `value` into `field`, converting numbers leniently.
    fn set_field(&mut self, field: Self::Field, value: &str);

    /// An entry whose required fields are all empty is removed by row edits.
    fn is_blank(&self) -> bool;
}

/// What a row edit did to the list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    Appended(usize),
    Updated(usize),
    Deleted(usize),
    /// The row was out of range, or a blank value was typed into the blank row.
    Ignored,
}

/// Append / update / delete by index.
pub trait EntryList<E: Entry> {
    fn append_entry(&mut self, entry: E) -> usize;

    /// Updates one field of an existing entry. Out-of-range rows are ignored.
    fn update_entry_field(&mut self, index: usize, field: E::Field, value: &str) -> bool;

    fn delete_entry(&mut self, index: usize) -> Option<E>;

    /// Applies an edit to a table row where row `len()` is the blank row.
    fn apply_row_edit(&mut self, row: usize, field: E::Field, value: &str) -> EditOutcome;
}

impl<E: Entry> EntryList<E> for Vec<E> {
    fn append_entry(&mut self, entry: E) -> usize {
        self.push(entry);
        self.len() - 1
    }

    fn update_entry_field(&mut self, index: usize, field: E::Field, value: &str) -> bool {
        match self.get_mut(index) {
            Some(entry) => {
                entry.set_field(field, value);
                true
            }
            None => false,
        }
    }

    fn delete_entry(&mut self, index: usize) -> Option<E> {
        if index < self.len() {
            Some(self.remove(index))
        } else {
            None
        }
    }

    fn apply_row_edit(&mut self, row: usize, field: E::Field, value: &str) -> EditOutcome {
        if row == self.len() {
            let mut entry = E::default();
            entry.set_field(field, value);
            if entry.is_blank() {
                return EditOutcome::Ignored;
            }
            return EditOutcome::Appended(self.append_entry(entry));
        }
        if !self.update_entry_field(row, field, value) {
            tracing::debug!(row, len = self.len(), "ignoring edit past the blank row");
            return EditOutcome::Ignored;
        }
        if self[row].is_blank() {
            self.remove(row);
            EditOutcome::Deleted(row)
        } else {
            EditOutcome::Updated(row)
        }
    }
}

/// Integer fields are typed as text; anything unparsable reads as zero.
fn parse_int(value: &str) -> i32 {
    parse_number(value) as i32
}

/// A fleet or hazard that appears every `period` days on average.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicEvent {
    pub name: String,
    pub period: i32,
}

impl PeriodicEvent {
    #[must_use]
    pub fn new(name: impl Into<String>, period: i32) -> Self {
        PeriodicEvent {
            name: name.into(),
            period,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodicField {
    Name,
    Period,
}

impl Entry for PeriodicEvent {
    type Field = PeriodicField;

    fn set_field(&mut self, field: PeriodicField, value: &str) {
        match field {
            PeriodicField::Name => self.name = value.to_string(),
            PeriodicField::Period => self.period = parse_int(value),
        }
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty() && self.period == 0
    }
}

/// A fleet that raids the system when its attraction is in range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RaidFleet {
    pub fleet_name: String,
    pub minimum_attraction: f64,
    pub maximum_attraction: f64,
}

impl Default for RaidFleet {
    fn default() -> Self {
        RaidFleet {
            fleet_name: String::new(),
            minimum_attraction: 2.,
            maximum_attraction: 0.,
        }
    }
}

impl RaidFleet {
    #[must_use]
    pub fn new(fleet_name: impl Into<String>, minimum: f64, maximum: f64) -> Self {
        RaidFleet {
            fleet_name: fleet_name.into(),
            minimum_attraction: minimum,
            maximum_attraction: maximum,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaidField {
    Name,
    Minimum,
    Maximum,
}

impl Entry for RaidFleet {
    type Field = RaidField;

    fn set_field(&mut self, field: RaidField, value: &str) {
        match field {
            RaidField::Name => self.fleet_name = value.to_string(),
            RaidField::Minimum => self.minimum_attraction = parse_number(value),
            RaidField::Maximum => self.maximum_attraction = parse_number(value),
        }
    }

    fn is_blank(&self) -> bool {
        self.fleet_name.is_empty()
    }
}

/// Mineable asteroids of one type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Minable {
    pub kind: String,
    pub count: i32,
    pub energy: f64,
}

impl Minable {
    #[must_use]
    pub fn new(kind: impl Into<String>, count: i32, energy: f64) -> Self {
        Minable {
            kind: kind.into(),
            count,
            energy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinableField {
    Kind,
    Count,
    Energy,
}

impl Entry for Minable {
    type Field = MinableField;

    fn set_field(&mut self, field: MinableField, value: &str) {
        match field {
            MinableField::Kind => self.kind = value.to_string(),
            MinableField::Count => self.count = parse_int(value),
            MinableField::Energy => self.energy = parse_number(value),
        }
    }

    fn is_blank(&self) -> bool {
        self.kind.is_empty() && self.count == 0
    }
}

/// A fleet that defends a planet demanding tribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TributeFleet {
    pub name: String,
    pub count: i32,
}

impl Default for TributeFleet {
    fn default() -> Self {
        TributeFleet {
            name: String::new(),
            count: 1,
        }
    }
}

impl TributeFleet {
    #[must_use]
    pub fn new(name: impl Into<String>, count: i32) -> Self {
        TributeFleet {
            name: name.into(),
            count,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TributeField {
    Name,
    Count,
}

impl Entry for TributeFleet {
    type Field = TributeField;

    fn set_field(&mut self, field: TributeField, value: &str) {
        match field {
            TributeField::Name => self.name = value.to_string(),
            TributeField::Count => self.count = parse_int(value).max(1),
        }
    }

    fn is_blank(&self) -> bool {
        self.name.is_empty()
    }
}

/// Plain name lists such as shipyards and outfitters.
impl Entry for String {
    type Field = ();

    fn set_field(&mut self, _: (), value: &str) {
        *self = value.to_string();
    }

    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}
