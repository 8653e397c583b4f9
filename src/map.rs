//! Name-keyed collections and the map document that owns them.
//!
//! This module provides [`Registry`], a wrapper around [`IndexMap`] keyed by
//! each entity's true name, and [`MapData`], which holds every system and
//! planet of a loaded map file.
//!
//! ## Why IndexMap?
//!
//! Entities are written back in the order they were read, so a load and save
//! with no edits leaves the file's layout alone and diffs stay small.
//!
//! ## Examples
//!
//! ```rust
//! use skyfile::MapData;
//!
//! let text = "system Sol\n\tlink Alpha\nsystem Alpha\n\tlink Sol\nplanet Earth\n";
//! let mut map = MapData::parse(text);
//! map.rename_system("Alpha", "Alpha Centauri").unwrap();
//!
//! let sol = map.system("Sol").unwrap();
//! assert!(sol.links().contains("Alpha Centauri"));
//! assert!(map.is_modified());
//! ```

use crate::{DataFile, DataNode, DataWriter, Error, Planet, Result, System, WriterOptions};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

mod sealed {
    /// Only [`super::Registry::rename`] may change a stored entity's name.
    pub trait Rename {
        fn rename_to(&mut self, name: &str);
    }
}

/// An entity stored in a [`Registry`] under its true name.
///
/// The trait is sealed: names change only through [`Registry::rename`], so
/// keys and true names never disagree.
pub trait Named: sealed::Rename {
    /// Used in error messages ("system", "planet").
    const KIND: &'static str;

    fn true_name(&self) -> &str;
}

impl sealed::Rename for System {
    fn rename_to(&mut self, name: &str) {
        self.set_true_name(name);
    }
}

impl Named for System {
    const KIND: &'static str = "system";

    fn true_name(&self) -> &str {
        System::true_name(self)
    }
}

impl sealed::Rename for Planet {
    fn rename_to(&mut self, name: &str) {
        self.set_true_name(name);
    }
}

impl Named for Planet {
    const KIND: &'static str = "planet";

    fn true_name(&self) -> &str {
        Planet::true_name(self)
    }
}

/// Entities keyed by true name, in insertion order.
///
/// Keys always equal the stored entity's true name; change names with
/// [`Registry::rename`], never through [`Registry::get_mut`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Registry<T>(IndexMap<String, T>);

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Registry(IndexMap::new())
    }
}

impl<T: Named> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&T> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.0.get_mut(name)
    }

    /// Adds an entity at the end. Fails if the name is taken.
    pub fn insert(&mut self, value: T) -> Result<()> {
        let name = value.true_name();
        if self.0.contains_key(name) {
            return Err(Error::duplicate_name(T::KIND, name));
        }
        self.0.insert(name.to_string(), value);
        Ok(())
    }

    /// Removes an entity, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.0.shift_remove(name)
    }

    /// Changes an entity's key and true name together, keeping its position.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateName`] if `to` is taken, [`Error::UnknownName`] if
    /// `from` is not registered. The registry is unchanged on error.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return if self.contains(from) {
                Ok(())
            } else {
                Err(Error::unknown_name(T::KIND, from))
            };
        }
        if self.contains(to) {
            return Err(Error::duplicate_name(T::KIND, to));
        }
        let Some((index, _, mut value)) = self.0.shift_remove_full(from) else {
            return Err(Error::unknown_name(T::KIND, from));
        };
        sealed::Rename::rename_to(&mut value, to);
        self.0.shift_insert(index, to.to_string(), value);
        Ok(())
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, T> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, T> {
        self.0.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, T> {
        self.0.values_mut()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, T> {
        self.0.iter()
    }
}

impl<'a, T> IntoIterator for &'a Registry<T> {
    type Item = (&'a String, &'a T);
    type IntoIter = indexmap::map::Iter<'a, String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T: Named> FromIterator<T> for Registry<T> {
    /// Later entities with a duplicate name replace earlier ones.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Registry(
            iter.into_iter()
                .map(|value| (value.true_name().to_string(), value))
                .collect(),
        )
    }
}

/// Every system and planet in one map file, plus the nodes the editor does
/// not model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapData {
    systems: Registry<System>,
    planets: Registry<Planet>,
    unparsed: Vec<DataNode>,
    comments: String,
    modified: bool,
}

impl MapData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut map = MapData::new();
        map.load(&DataFile::parse(input));
        map
    }

    /// Adds everything in `file`. A second definition of an existing system
    /// or planet is loaded on top of the first.
    pub fn load(&mut self, file: &DataFile) {
        for node in file {
            let name = node.token(1);
            match node.keyword() {
                "system" if node.size() >= 2 => match self.systems.get_mut(name) {
                    Some(system) => {
                        debug!(name, "merging repeated system definition");
                        system.load(node);
                    }
                    None => {
                        self.systems
                            .0
                            .insert(name.to_string(), System::from_node(node));
                    }
                },
                "planet" if node.size() >= 2 => match self.planets.get_mut(name) {
                    Some(planet) => {
                        debug!(name, "merging repeated planet definition");
                        planet.load(node);
                    }
                    None => {
                        self.planets
                            .0
                            .insert(name.to_string(), Planet::from_node(node));
                    }
                },
                keyword => {
                    debug!(keyword, "keeping unrecognized top-level node");
                    self.unparsed.push(node.clone());
                }
            }
        }
        self.comments.push_str(file.comments());
        self.modified = false;
    }

    /// Writes the comment lines first, then systems, planets, and any other
    /// top-level nodes.
    #[must_use]
    pub fn save(&self, options: &WriterOptions) -> String {
        let mut file = DataWriter::new(options.clone());
        for system in self.systems.values() {
            system.save(&mut file);
        }
        for planet in self.planets.values() {
            planet.save(&mut file);
        }
        for node in &self.unparsed {
            file.write_node(node);
        }
        let mut text = self.comments.clone();
        text.push_str(&file.into_inner());
        text
    }

    #[must_use]
    pub fn systems(&self) -> &Registry<System> {
        &self.systems
    }

    #[must_use]
    pub fn planets(&self) -> &Registry<Planet> {
        &self.planets
    }

    #[must_use]
    pub fn system(&self, name: &str) -> Option<&System> {
        self.systems.get(name)
    }

    /// Marks the map modified, since the caller may change anything.
    ///
    /// The true name is not among those things; use
    /// [`MapData::rename_system`]:
    ///
    /// ```compile_fail
    /// let mut map = skyfile::from_str("system Sol\n\tpos 0 0\n");
    /// map.system_mut("Sol").unwrap().set_true_name("Sun");
    /// ```
    pub fn system_mut(&mut self, name: &str) -> Option<&mut System> {
        let system = self.systems.get_mut(name)?;
        self.modified = true;
        Some(system)
    }

    #[must_use]
    pub fn planet(&self, name: &str) -> Option<&Planet> {
        self.planets.get(name)
    }

    /// Marks the map modified, since the caller may change anything.
    pub fn planet_mut(&mut self, name: &str) -> Option<&mut Planet> {
        let planet = self.planets.get_mut(name)?;
        self.modified = true;
        Some(planet)
    }

    #[must_use]
    pub fn unparsed(&self) -> &[DataNode] {
        &self.unparsed
    }

    /// Comment lines stripped while loading, one per line.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn insert_system(&mut self, system: System) -> Result<()> {
        self.systems.insert(system)?;
        self.modified = true;
        Ok(())
    }

    pub fn insert_planet(&mut self, planet: Planet) -> Result<()> {
        self.planets.insert(planet)?;
        self.modified = true;
        Ok(())
    }

    /// Removes a system and every link pointing at it.
    pub fn remove_system(&mut self, name: &str) -> Option<System> {
        let system = self.systems.remove(name)?;
        for other in self.systems.values_mut() {
            other.change_link(name, "");
        }
        self.modified = true;
        Some(system)
    }

    /// Removes a planet. Stellar objects that depicted it keep their sprite
    /// but no longer refer to a planet.
    pub fn remove_planet(&mut self, name: &str) -> Option<Planet> {
        let planet = self.planets.remove(name)?;
        for system in self.systems.values_mut() {
            system.rename_planet(name, "");
        }
        self.modified = true;
        Some(planet)
    }

    /// Renames a system and rewrites every link to it.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if `to` is empty or taken, or if
    /// `from` does not exist.
    pub fn rename_system(&mut self, from: &str, to: &str) -> Result<()> {
        if to.is_empty() {
            return Err(Error::custom("a system needs a name"));
        }
        if let Err(err) = self.systems.rename(from, to) {
            warn!(from, to, %err, "rejected system rename");
            return Err(err);
        }
        for system in self.systems.values_mut() {
            system.change_link(from, to);
        }
        self.modified = true;
        Ok(())
    }

    /// Renames a planet and every stellar object that refers to it.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MapData::rename_system`].
    pub fn rename_planet(&mut self, from: &str, to: &str) -> Result<()> {
        if to.is_empty() {
            return Err(Error::custom("a planet needs a name"));
        }
        if let Err(err) = self.planets.rename(from, to) {
            warn!(from, to, %err, "rejected planet rename");
            return Err(err);
        }
        let objects: usize = self
            .systems
            .values_mut()
            .map(|system| system.rename_planet(from, to))
            .sum();
        debug!(from, to, objects, "renamed planet");
        self.modified = true;
        Ok(())
    }

    /// Links two systems if they are unlinked, or unlinks them.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownName`] if either system is missing.
    pub fn toggle_link(&mut self, first: &str, second: &str) -> Result<()> {
        let linked = match (self.systems.get(first), self.systems.contains(second)) {
            (Some(system), true) => system.links().contains(second),
            (None, _) => return Err(Error::unknown_name(System::KIND, first)),
            (_, false) => return Err(Error::unknown_name(System::KIND, second)),
        };
        if first == second {
            return Ok(());
        }
        for (name, other) in [(first, second), (second, first)] {
            if let Some(system) = self.systems.get_mut(name) {
                system.set_link(other, !linked);
            }
        }
        self.modified = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
# Human space
system Sol
\tpos 0 0
\tlink Alpha
\tobject Earth
\t\tsprite planet/earth
\t\tdistance 500
\t\tperiod 300
system Alpha
\tpos 30 40
\tlink Sol
planet Earth
\tgovernment Republic
government Republic
\tcolor 1 1 1
";

    #[test]
    fn test_load_sorts_nodes_by_kind() {
        let map = MapData::parse(MAP);
        assert_eq!(map.systems().len(), 2);
        assert_eq!(map.planets().len(), 1);
        assert_eq!(map.unparsed()[0].keyword(), "government");
        assert_eq!(map.comments(), "# Human space\n");
        assert!(!map.is_modified());
    }

    #[test]
    fn test_save_round_trip() {
        let map = MapData::parse(MAP);
        assert_eq!(map.save(&WriterOptions::default()), MAP);
    }

    #[test]
    fn test_rename_planet_updates_objects() {
        let mut map = MapData::parse(MAP);
        map.rename_planet("Earth", "Terra").unwrap();
        assert!(map.planet("Earth").is_none());
        assert_eq!(map.planet("Terra").unwrap().true_name(), "Terra");
        let sol = map.system("Sol").unwrap();
        assert_eq!(sol.objects()[0].planet(), "Terra");
    }

    #[test]
    fn test_failed_rename_changes_nothing() {
        let mut map = MapData::parse(MAP);
        let before = map.clone();
        assert!(matches!(
            map.rename_system("Sol", "Alpha"),
            Err(Error::DuplicateName { .. })
        ));
        assert!(matches!(
            map.rename_system("Vega", "Deneb"),
            Err(Error::UnknownName { .. })
        ));
        assert!(map.rename_planet("Earth", "").is_err());
        assert_eq!(map, before);
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut map = MapData::parse(MAP);
        map.rename_system("Sol", "Sun").unwrap();
        let names: Vec<_> = map.systems().keys().collect();
        assert_eq!(names, vec!["Sun", "Alpha"]);
        assert!(map.system("Alpha").unwrap().links().contains("Sun"));
    }

    #[test]
    fn test_keys_follow_true_names() {
        let mut map = MapData::parse(MAP);
        map.rename_system("Alpha", "Alpha Centauri").unwrap();
        map.rename_planet("Earth", "Terra").unwrap();
        if let Some(sol) = map.system_mut("Sol") {
            sol.set_display_name("Home");
        }

        for (key, system) in map.systems().iter() {
            assert_eq!(key, system.true_name());
        }
        for (key, planet) in map.planets().iter() {
            assert_eq!(key, planet.true_name());
        }
        assert_eq!(map.system("Sol").unwrap().display_name(), "Home");
        assert!(map.system("Sol").unwrap().links().contains("Alpha Centauri"));

        let reloaded = MapData::parse(&map.save(&WriterOptions::default()));
        assert!(reloaded.system("Alpha Centauri").is_some());
        assert!(reloaded.planet("Terra").is_some());
    }

    #[test]
    fn test_toggle_link() {
        let mut map = MapData::parse(MAP);
        map.toggle_link("Alpha", "Sol").unwrap();
        assert!(map.system("Sol").unwrap().links().is_empty());
        assert!(map.system("Alpha").unwrap().links().is_empty());
        map.toggle_link("Sol", "Alpha").unwrap();
        assert!(map.system("Alpha").unwrap().links().contains("Sol"));
        assert!(map.toggle_link("Sol", "Vega").is_err());
    }

    #[test]
    fn test_remove_system_drops_links() {
        let mut map = MapData::parse(MAP);
        assert!(map.remove_system("Alpha").is_some());
        assert!(map.system("Sol").unwrap().links().is_empty());
        assert!(map.remove_system("Alpha").is_none());
    }

    #[test]
    fn test_insert_duplicate() {
        let mut map = MapData::new();
        map.insert_planet(Planet::named("Earth")).unwrap();
        let err = map.insert_planet(Planet::named("Earth")).unwrap_err();
        assert_eq!(err, Error::duplicate_name("planet", "Earth"));
    }
}
