//! Star systems.
//!
//! A [`System`] loads from a `system <name>` node and saves back to the same
//! shape. Children it does not recognize are kept in order and written back
//! after the recognized fields, so data from newer game versions survives an
//! edit.
//!
//! ```rust
//! use skyfile::{DataFile, System};
//!
//! let file = DataFile::parse("system Sol\n\tpos 0 0\n\tgovernment Republic\n");
//! let sol = System::from_node(&file.root().children()[0]);
//! assert_eq!(sol.true_name(), "Sol");
//! assert_eq!(sol.display_name(), "Sol");
//! assert_eq!(sol.government(), "Republic");
//! ```

use crate::writer::{format_compact_period, format_number};
use crate::{
    DataNode, DataWriter, EntityName, Minable, PeriodicEvent, Point, RaidFleet, StellarObject,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ordinary (non-minable) asteroids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub kind: String,
    pub count: i32,
    pub energy: f64,
}

impl Asteroid {
    #[must_use]
    pub fn new(kind: impl Into<String>, count: i32, energy: f64) -> Self {
        Asteroid {
            kind: kind.into(),
            count,
            energy,
        }
    }
}

/// An asteroid belt radius with its relative weight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Belt {
    pub radius: f64,
    pub weight: i32,
}

impl Belt {
    #[must_use]
    pub fn new(radius: f64, weight: i32) -> Self {
        Belt { radius, weight }
    }
}

/// Ramscoop overrides. Each value is optional; unset values inherit the
/// game's defaults and are not written.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ramscoop {
    pub universal: Option<bool>,
    pub addend: Option<f64>,
    pub multiplier: Option<f64>,
    pub unparsed: Vec<DataNode>,
}

impl Ramscoop {
    fn is_default(&self) -> bool {
        self.universal.is_none()
            && self.addend.is_none()
            && self.multiplier.is_none()
            && self.unparsed.is_empty()
    }
}

/// A star system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct System {
    name: EntityName,
    position: Point,
    government: String,
    attributes: BTreeSet<String>,
    links: BTreeSet<String>,

    jump_range: f64,
    hyperspace_arrival: f64,
    jump_arrival: f64,
    hyperspace_departure: f64,
    jump_departure: f64,

    /// Every object's parent appears before it.
    pub(crate) objects: Vec<StellarObject>,
    pub(crate) habitable: Option<f64>,

    ramscoop: Ramscoop,
    haze: String,
    starfield_density: f64,
    music: String,

    pub(crate) asteroids: Vec<Asteroid>,
    pub(crate) minables: Vec<Minable>,
    pub(crate) belts: Vec<Belt>,
    trade: BTreeMap<String, i32>,
    fleets: Vec<PeriodicEvent>,
    hazards: Vec<PeriodicEvent>,

    hidden: bool,
    shrouded: bool,
    inaccessible: bool,
    invisible_fence: f64,

    raid_fleets: Vec<RaidFleet>,
    no_raids: bool,

    unparsed: Vec<DataNode>,

    #[serde(skip)]
    pub(crate) time_step: f64,
}

const DEFAULT_INVISIBLE_FENCE: f64 = 10000.;
const DEFAULT_JUMP_RANGE: f64 = 100.;

impl Default for System {
    fn default() -> Self {
        System {
            name: EntityName::default(),
            position: Point::default(),
            government: String::new(),
            attributes: BTreeSet::new(),
            links: BTreeSet::new(),
            jump_range: 0.,
            hyperspace_arrival: 0.,
            jump_arrival: 0.,
            hyperspace_departure: 0.,
            jump_departure: 0.,
            objects: Vec::new(),
            habitable: None,
            ramscoop: Ramscoop::default(),
            haze: String::new(),
            starfield_density: 1.,
            music: String::new(),
            asteroids: Vec::new(),
            minables: Vec::new(),
            belts: Vec::new(),
            trade: BTreeMap::new(),
            fleets: Vec::new(),
            hazards: Vec::new(),
            hidden: false,
            shrouded: false,
            inaccessible: false,
            invisible_fence: DEFAULT_INVISIBLE_FENCE,
            raid_fleets: Vec::new(),
            no_raids: false,
            unparsed: Vec::new(),
            time_step: 0.,
        }
    }
}

impl System {
    /// An empty system with no objects.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        System {
            name: EntityName::new(name),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn from_node(node: &DataNode) -> Self {
        let mut system = System::default();
        system.load(node);
        system
    }

    /// Reads a `system <name>` node on top of the current values. Nodes
    /// with no name are ignored.
    pub(crate) fn load(&mut self, node: &DataNode) {
        if node.size() < 2 {
            return;
        }
        self.name = EntityName::new(node.token(1));
        self.habitable = None;

        for child in node {
            let size = child.size();
            match child.keyword() {
                "display name" if size >= 2 => self.name.set_display_name(child.token(1)),
                "pos" if size >= 3 => self.position = Point::new(child.value(1), child.value(2)),
                "attributes" => {
                    self.attributes
                        .extend(child.tokens()[1..].iter().cloned());
                }
                "hidden" => self.hidden = true,
                "shrouded" => self.shrouded = true,
                "inaccessible" => self.inaccessible = true,
                "jump range" if size >= 2 => self.jump_range = child.value(1).max(0.),
                "arrival" if size >= 2 || child.has_children() => {
                    if size >= 2 {
                        self.hyperspace_arrival = child.value(1);
                        self.jump_arrival = self.hyperspace_arrival.abs();
                    }
                    for grand in child.iter().filter(|grand| grand.size() >= 2) {
                        match grand.keyword() {
                            "link" => self.hyperspace_arrival = grand.value(1),
                            "jump" => self.jump_arrival = grand.value(1).abs(),
                            _ => {}
                        }
                    }
                }
                "departure" if size >= 2 || child.has_children() => {
                    if size >= 2 {
                        self.hyperspace_departure = child.value(1).abs();
                        self.jump_departure = self.hyperspace_departure;
                    }
                    for grand in child.iter().filter(|grand| grand.size() >= 2) {
                        match grand.keyword() {
                            "link" => self.hyperspace_departure = grand.value(1).abs(),
                            "jump" => self.jump_departure = grand.value(1).abs(),
                            _ => {}
                        }
                    }
                }
                "government" if size >= 2 => self.government = child.token(1).to_string(),
                "ramscoop" if child.has_children() => self.load_ramscoop(child),
                "habitable" if size >= 2 => self.habitable = Some(child.value(1)),
                "belt" if size >= 2 => {
                    let weight = if size >= 3 { child.value(2) as i32 } else { 1 };
                    self.belts.push(Belt::new(child.value(1), weight));
                }
                "haze" if size >= 2 => self.haze = child.token(1).to_string(),
                "music" if size >= 2 => self.music = child.token(1).to_string(),
                "link" if size >= 2 => {
                    self.links.insert(child.token(1).to_string());
                }
                "asteroids" if size >= 4 => self.asteroids.push(Asteroid::new(
                    child.token(1),
                    child.value(2) as i32,
                    child.value(3),
                )),
                "minables" if size >= 3 => self.minables.push(Minable::new(
                    child.token(1),
                    child.value(2) as i32,
                    child.value(3),
                )),
                "trade" if size >= 3 => {
                    self.trade
                        .insert(child.token(1).to_string(), child.value(2) as i32);
                }
                "fleet" if size >= 3 => self
                    .fleets
                    .push(PeriodicEvent::new(child.token(1), child.value(2) as i32)),
                "hazard" if size >= 3 => self
                    .hazards
                    .push(PeriodicEvent::new(child.token(1), child.value(2) as i32)),
                "raid" if size >= 2 => {
                    let mut raid = RaidFleet::new(child.token(1), 2., 0.);
                    if size >= 3 {
                        raid.minimum_attraction = child.value(2);
                    }
                    if size >= 4 {
                        raid.maximum_attraction = child.value(3);
                    }
                    self.raid_fleets.push(raid);
                }
                "no raids" => self.no_raids = true,
                "invisible fence" if size >= 2 => self.invisible_fence = child.value(1),
                "starfield density" if size >= 2 => self.starfield_density = child.value(1),
                "object" => self.load_object(child, None),
                _ => self.unparsed.push(child.clone()),
            }
        }
    }

    fn load_ramscoop(&mut self, node: &DataNode) {
        for grand in node {
            let has_value = grand.size() >= 2;
            match grand.keyword() {
                "addend" if has_value => self.ramscoop.addend = Some(grand.value(1)),
                "multiplier" if has_value => self.ramscoop.multiplier = Some(grand.value(1)),
                "universal" if has_value => {
                    let value = grand.token(1);
                    self.ramscoop.universal = Some(value == "true" || value == "1");
                }
                _ => self.ramscoop.unparsed.push(grand.clone()),
            }
        }
    }

    fn load_object(&mut self, node: &DataNode, parent: Option<usize>) {
        let index = self.objects.len();
        let mut object = StellarObject::new("", parent);
        if node.size() >= 2 {
            object.planet = node.token(1).to_string();
        }
        self.objects.push(object);

        for child in node {
            let has_value = child.size() >= 2;
            let object = &mut self.objects[index];
            match child.keyword() {
                "sprite" if has_value => {
                    object.sprite = child.token(1).to_string();
                    object
                        .sprite_properties
                        .extend(child.children().iter().cloned());
                }
                "distance" if has_value => object.distance = child.value(1),
                "period" if has_value => object.period = child.value(1),
                "offset" if has_value => object.offset = child.value(1),
                "object" => self.load_object(child, Some(index)),
                _ => object.unparsed.push(child.clone()),
            }
        }
    }

    /// Writes the system in canonical field order, then unrecognized nodes,
    /// then its objects.
    pub fn save(&self, file: &mut DataWriter) {
        file.write(&[&"system", &self.true_name()]);
        file.begin_child();

        if self.hidden {
            file.write(&[&"hidden"]);
        }
        if self.shrouded {
            file.write(&[&"shrouded"]);
        }
        if self.inaccessible {
            file.write(&[&"inaccessible"]);
        }
        file.write(&[&"pos", &self.position.x, &self.position.y]);
        if self.has_display_name() {
            file.write(&[&"display name", &self.display_name()]);
        }
        if !self.government.is_empty() {
            file.write(&[&"government", &self.government]);
        }
        if !self.attributes.is_empty() {
            file.write_token("attributes");
            for attribute in &self.attributes {
                file.write_token(attribute);
            }
            file.end_line();
        }
        save_distances(file, "arrival", self.hyperspace_arrival, self.jump_arrival);
        save_distances(file, "departure", self.hyperspace_departure, self.jump_departure);
        if !self.ramscoop.is_default() {
            file.write(&[&"ramscoop"]);
            file.begin_child();
            if let Some(universal) = self.ramscoop.universal {
                file.write(&[&"universal", &if universal { "1" } else { "0" }]);
            }
            if let Some(addend) = self.ramscoop.addend {
                file.write(&[&"addend", &addend]);
            }
            if let Some(multiplier) = self.ramscoop.multiplier {
                file.write(&[&"multiplier", &multiplier]);
            }
            for node in &self.ramscoop.unparsed {
                file.write_node(node);
            }
            file.end_child();
        }
        if let Some(habitable) = self.habitable {
            file.write(&[&"habitable", &habitable]);
        }
        if let [belt] = self.belts.as_slice() {
            file.write(&[&"belt", &belt.radius]);
        } else {
            for belt in &self.belts {
                file.write(&[&"belt", &belt.radius, &belt.weight]);
            }
        }
        if self.invisible_fence != DEFAULT_INVISIBLE_FENCE {
            file.write(&[&"invisible fence", &self.invisible_fence]);
        }
        if self.jump_range != 0. && self.jump_range != DEFAULT_JUMP_RANGE {
            file.write(&[&"jump range", &self.jump_range]);
        }
        if !self.haze.is_empty() {
            file.write(&[&"haze", &self.haze]);
        }
        if self.starfield_density != 1. {
            file.write(&[&"starfield density", &self.starfield_density]);
        }
        if !self.music.is_empty() {
            file.write(&[&"music", &self.music]);
        }
        for link in &self.links {
            file.write(&[&"link", link]);
        }
        for asteroid in &self.asteroids {
            file.write(&[&"asteroids", &asteroid.kind, &asteroid.count, &asteroid.energy]);
        }
        for minable in &self.minables {
            file.write(&[&"minables", &minable.kind, &minable.count, &minable.energy]);
        }
        for (commodity, price) in &self.trade {
            file.write(&[&"trade", commodity, price]);
        }
        for fleet in self.fleets.iter().filter(|it| !it.name.is_empty() && it.period != 0) {
            file.write(&[&"fleet", &fleet.name, &fleet.period]);
        }
        for hazard in self.hazards.iter().filter(|it| !it.name.is_empty() && it.period != 0) {
            file.write(&[&"hazard", &hazard.name, &hazard.period]);
        }
        if self.no_raids {
            file.write(&[&"no raids"]);
        }
        for raid in self.raid_fleets.iter().filter(|it| !it.fleet_name.is_empty()) {
            file.write(&[
                &"raid",
                &raid.fleet_name,
                &raid.minimum_attraction,
                &raid.maximum_attraction,
            ]);
        }
        for node in &self.unparsed {
            file.write_node(node);
        }
        for index in 0..self.objects.len() {
            self.save_object(file, index);
        }

        file.end_child();
    }

    fn save_object(&self, file: &mut DataWriter, index: usize) {
        let object = &self.objects[index];
        let mut depth = 0;
        let mut parent = object.parent;
        while let Some(p) = parent {
            file.begin_child();
            depth += 1;
            parent = self.objects.get(p).and_then(|it| it.parent);
        }

        if object.planet.is_empty() {
            file.write(&[&"object"]);
        } else {
            file.write(&[&"object", &object.planet]);
        }
        file.begin_child();
        if !object.sprite.is_empty() {
            file.write(&[&"sprite", &object.sprite]);
            file.begin_child();
            for property in &object.sprite_properties {
                file.write_node(property);
            }
            file.end_child();
        }
        if object.distance != 0. {
            file.write(&[&"distance", &object.distance]);
        }
        if object.period != 0. {
            let period = if file.options().compact_periods {
                format_compact_period(object.period)
            } else {
                format_number(object.period)
            };
            file.write(&[&"period", &period]);
        }
        if object.offset != 0. {
            file.write(&[&"offset", &object.offset]);
        }
        for node in &object.unparsed {
            file.write_node(node);
        }
        file.end_child();

        for _ in 0..depth {
            file.end_child();
        }
    }

    #[must_use]
    pub fn name(&self) -> &EntityName {
        &self.name
    }

    #[must_use]
    pub fn true_name(&self) -> &str {
        self.name.true_name()
    }

    #[must_use]
    pub fn has_display_name(&self) -> bool {
        self.name.has_display_name()
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.display_name()
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn government(&self) -> &str {
        &self.government
    }

    #[must_use]
    pub fn attributes(&self) -> &BTreeSet<String> {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.attributes
    }

    #[must_use]
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    #[must_use]
    pub fn shrouded(&self) -> bool {
        self.shrouded
    }

    #[must_use]
    pub fn inaccessible(&self) -> bool {
        self.inaccessible
    }

    #[must_use]
    pub fn links(&self) -> &BTreeSet<String> {
        &self.links
    }

    #[must_use]
    pub fn jump_range(&self) -> f64 {
        self.jump_range
    }

    #[must_use]
    pub fn hyper_arrival(&self) -> f64 {
        self.hyperspace_arrival
    }

    #[must_use]
    pub fn jump_arrival(&self) -> f64 {
        self.jump_arrival
    }

    #[must_use]
    pub fn hyper_departure(&self) -> f64 {
        self.hyperspace_departure
    }

    #[must_use]
    pub fn jump_departure(&self) -> f64 {
        self.jump_departure
    }

    #[must_use]
    pub fn objects(&self) -> &[StellarObject] {
        &self.objects
    }

    /// Mutable access to one object. The parent index cannot be changed
    /// through this, so the ordering of the object list stays intact.
    pub fn object_mut(&mut self, index: usize) -> Option<&mut StellarObject> {
        self.objects.get_mut(index)
    }

    /// The habitable distance stored in the file, if any.
    #[must_use]
    pub fn habitable(&self) -> Option<f64> {
        self.habitable
    }

    #[must_use]
    pub fn ramscoop(&self) -> &Ramscoop {
        &self.ramscoop
    }

    #[must_use]
    pub fn has_ramscoop_universal(&self) -> bool {
        self.ramscoop.universal.unwrap_or(true)
    }

    #[must_use]
    pub fn ramscoop_addend(&self) -> f64 {
        self.ramscoop.addend.unwrap_or(0.)
    }

    #[must_use]
    pub fn ramscoop_multiplier(&self) -> f64 {
        self.ramscoop.multiplier.unwrap_or(1.)
    }

    #[must_use]
    pub fn haze(&self) -> &str {
        &self.haze
    }

    #[must_use]
    pub fn music(&self) -> &str {
        &self.music
    }

    #[must_use]
    pub fn starfield_density(&self) -> f64 {
        self.starfield_density
    }

    #[must_use]
    pub fn invisible_fence(&self) -> f64 {
        self.invisible_fence
    }

    #[must_use]
    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    #[must_use]
    pub fn belts(&self) -> &[Belt] {
        &self.belts
    }

    #[must_use]
    pub fn minables(&self) -> &Vec<Minable> {
        &self.minables
    }

    pub fn minables_mut(&mut self) -> &mut Vec<Minable> {
        &mut self.minables
    }

    /// Price of a commodity, or 0 if the system does not trade it.
    #[must_use]
    pub fn trade(&self, commodity: &str) -> i32 {
        self.trade.get(commodity).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn trade_table(&self) -> &BTreeMap<String, i32> {
        &self.trade
    }

    #[must_use]
    pub fn fleets(&self) -> &Vec<PeriodicEvent> {
        &self.fleets
    }

    pub fn fleets_mut(&mut self) -> &mut Vec<PeriodicEvent> {
        &mut self.fleets
    }

    #[must_use]
    pub fn hazards(&self) -> &Vec<PeriodicEvent> {
        &self.hazards
    }

    pub fn hazards_mut(&mut self) -> &mut Vec<PeriodicEvent> {
        &mut self.hazards
    }

    #[must_use]
    pub fn raids_disabled(&self) -> bool {
        self.no_raids
    }

    #[must_use]
    pub fn raid_fleets(&self) -> &Vec<RaidFleet> {
        &self.raid_fleets
    }

    pub fn raid_fleets_mut(&mut self) -> &mut Vec<RaidFleet> {
        &mut self.raid_fleets
    }

    #[must_use]
    pub fn unparsed(&self) -> &[DataNode] {
        &self.unparsed
    }

    /// Places every object for the given day. Parents precede their
    /// children, so a single pass sees each parent already positioned.
    pub fn set_day(&mut self, day: f64) {
        self.time_step = day;
        for index in 0..self.objects.len() {
            let object = &self.objects[index];
            let turns = if object.period == 0. {
                0.
            } else {
                day * 360. / object.period
            };
            let angle = (turns + object.offset).to_radians();
            let mut position =
                Point::new(object.distance * angle.sin(), -object.distance * angle.cos());
            if let Some(parent) = object.parent {
                position = position + self.objects[parent].position;
            }
            self.objects[index].position = position;
        }
    }

    #[must_use]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Changes the key only; links in other systems are the registry's job.
    pub(crate) fn set_true_name(&mut self, name: impl Into<String>) {
        self.name.set_true_name(name);
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.name.set_display_name(name);
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_government(&mut self, government: impl Into<String>) {
        self.government = government.into();
    }

    pub fn toggle_hidden(&mut self) {
        self.hidden = !self.hidden;
    }

    pub fn toggle_shrouded(&mut self) {
        self.shrouded = !self.shrouded;
    }

    pub fn toggle_inaccessible(&mut self) {
        self.inaccessible = !self.inaccessible;
    }

    /// Links or unlinks two systems; both sides change together.
    pub fn toggle_link(&mut self, other: &mut System) {
        if other.true_name() == self.true_name() {
            return;
        }
        if self.links.remove(other.true_name()) {
            other.links.remove(self.true_name());
        } else {
            self.links.insert(other.true_name().to_string());
            other.links.insert(self.true_name().to_string());
        }
    }

    pub(crate) fn set_link(&mut self, name: &str, linked: bool) {
        if linked {
            self.links.insert(name.to_string());
        } else {
            self.links.remove(name);
        }
    }

    /// Renames a linked system. An empty `to` removes the link.
    pub fn change_link(&mut self, from: &str, to: &str) {
        if self.links.remove(from) && !to.is_empty() {
            self.links.insert(to.to_string());
        }
    }

    pub fn set_jump_range(&mut self, value: f64) {
        self.jump_range = value.max(0.);
    }

    pub fn set_hyper_arrival(&mut self, value: f64) {
        self.hyperspace_arrival = value;
    }

    pub fn set_jump_arrival(&mut self, value: f64) {
        self.jump_arrival = value;
    }

    pub fn set_hyper_departure(&mut self, value: f64) {
        self.hyperspace_departure = value;
    }

    pub fn set_jump_departure(&mut self, value: f64) {
        self.jump_departure = value;
    }

    pub fn set_trade(&mut self, commodity: impl Into<String>, price: i32) {
        self.trade.insert(commodity.into(), price);
    }

    pub fn remove_trade(&mut self, commodity: &str) -> Option<i32> {
        self.trade.remove(commodity)
    }

    pub fn toggle_ramscoop_universal(&mut self) {
        self.ramscoop.universal = Some(!self.has_ramscoop_universal());
    }

    pub fn set_ramscoop_universal(&mut self, value: Option<bool>) {
        self.ramscoop.universal = value;
    }

    pub fn set_ramscoop_addend(&mut self, value: Option<f64>) {
        self.ramscoop.addend = value;
    }

    pub fn set_ramscoop_multiplier(&mut self, value: Option<f64>) {
        self.ramscoop.multiplier = value;
    }

    pub fn toggle_raids(&mut self) {
        self.no_raids = !self.no_raids;
    }

    pub fn set_habitable(&mut self, value: Option<f64>) {
        self.habitable = value;
    }

    pub fn set_haze(&mut self, haze: impl Into<String>) {
        self.haze = haze.into();
    }

    pub fn set_music(&mut self, music: impl Into<String>) {
        self.music = music.into();
    }

    pub fn set_starfield_density(&mut self, value: f64) {
        self.starfield_density = value;
    }

    pub fn set_invisible_fence(&mut self, value: f64) {
        self.invisible_fence = value;
    }

    /// Renames every object that points at a planet.
    pub(crate) fn rename_planet(&mut self, from: &str, to: &str) -> usize {
        let mut count = 0;
        for object in self.objects.iter_mut().filter(|it| it.planet == from) {
            object.planet = to.to_string();
            count += 1;
        }
        count
    }
}

fn save_distances(file: &mut DataWriter, keyword: &str, link: f64, jump: f64) {
    if link == 0. && jump == 0. {
        return;
    }
    if link == jump {
        file.write(&[&keyword, &link]);
        return;
    }
    file.write(&[&keyword]);
    file.begin_child();
    if link != 0. {
        file.write(&[&"link", &link]);
    }
    if jump != 0. {
        file.write(&[&"jump", &jump]);
    }
    file.end_child();
}
