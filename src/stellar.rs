//! Stars, planets, moons and stations inside a system.

use crate::catalog::{self, BodyKind};
use crate::DataNode;
use serde::{Deserialize, Serialize};

/// A 2D position or offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

/// One object in a system's ordered object list.
///
/// The sprite path doubles as the object's category: stars live under
/// `star/`, and the catalog knows which body sprites are planets, giants,
/// moons or stations.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StellarObject {
    pub(crate) sprite: String,
    pub(crate) distance: f64,
    pub(crate) period: f64,
    pub(crate) offset: f64,
    pub(crate) planet: String,
    /// Index of the object this one orbits; always less than this object's own index.
    pub(crate) parent: Option<usize>,
    #[serde(skip)]
    pub(crate) position: Point,
    pub(crate) sprite_properties: Vec<DataNode>,
    pub(crate) unparsed: Vec<DataNode>,
}

impl StellarObject {
    #[must_use]
    pub fn new(sprite: impl Into<String>, parent: Option<usize>) -> Self {
        StellarObject {
            sprite: sprite.into(),
            parent,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn sprite(&self) -> &str {
        &self.sprite
    }

    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[must_use]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Angle in degrees at day zero.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Key of the landable planet this object depicts; empty if none.
    #[must_use]
    pub fn planet(&self) -> &str {
        &self.planet
    }

    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Position as of the last [`crate::System::set_day`].
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub fn sprite_properties(&self) -> &[DataNode] {
        &self.sprite_properties
    }

    #[must_use]
    pub fn unparsed(&self) -> &[DataNode] {
        &self.unparsed
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        catalog::radius(&self.sprite)
    }

    #[must_use]
    pub fn is_star(&self) -> bool {
        self.sprite.starts_with("star/")
    }

    /// Stars and rogue bodies that contribute to the system's mass.
    #[must_use]
    pub fn is_mass_source(&self) -> bool {
        (self.is_star() && !self.sprite.contains("-core")) || self.sprite.contains("rogue")
    }

    #[must_use]
    pub fn is_station(&self) -> bool {
        self.sprite.contains("station")
    }

    #[must_use]
    pub fn is_moon(&self) -> bool {
        self.kind() == Some(BodyKind::Moon)
    }

    #[must_use]
    pub fn is_giant(&self) -> bool {
        self.kind() == Some(BodyKind::Giant)
    }

    #[must_use]
    pub fn is_terrestrial(&self) -> bool {
        matches!(
            self.kind(),
            Some(BodyKind::Habitable) | Some(BodyKind::Uninhabited)
        )
    }

    #[must_use]
    pub fn is_inhabited(&self) -> bool {
        catalog::body(&self.sprite).is_some_and(|(_, body)| body.inhabited)
    }

    #[must_use]
    pub fn kind(&self) -> Option<BodyKind> {
        if self.is_station() {
            return Some(BodyKind::Station);
        }
        catalog::body(&self.sprite).map(|(kind, _)| kind)
    }

    pub fn set_sprite(&mut self, sprite: impl Into<String>) {
        self.sprite = sprite.into();
    }

    /// Sets the period directly. Useful for moons, whose periods the
    /// generator never derives.
    pub fn set_period(&mut self, period: f64) {
        self.period = period;
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset.rem_euclid(360.);
    }

    pub fn set_planet(&mut self, planet: impl Into<String>) {
        self.planet = planet.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_follow_sprite() {
        assert!(StellarObject::new("star/g0", None).is_star());
        assert!(StellarObject::new("planet/gas3", None).is_giant());
        assert!(StellarObject::new("planet/europa", Some(0)).is_moon());
        assert!(StellarObject::new("planet/station2", Some(0)).is_station());
        assert!(StellarObject::new("planet/station2", None).is_inhabited());
        assert!(StellarObject::new("planet/ice1", None).is_terrestrial());
        assert!(!StellarObject::new("planet/ice1", None).is_inhabited());
        assert!(StellarObject::new("planet/earth", None).is_inhabited());
    }

    #[test]
    fn test_mass_sources() {
        assert!(StellarObject::new("star/k3", None).is_mass_source());
        assert!(!StellarObject::new("star/wr-core", None).is_mass_source());
        assert!(StellarObject::new("star/browndwarf-l-rogue", None).is_mass_source());
        assert!(!StellarObject::new("planet/gas0", None).is_mass_source());
    }

    #[test]
    fn test_offset_wraps() {
        let mut object = StellarObject::default();
        object.set_offset(-90.);
        assert_eq!(object.offset(), 270.);
        object.set_offset(720.5);
        assert_eq!(object.offset(), 0.5);
    }
}
