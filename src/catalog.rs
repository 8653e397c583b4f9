//! Fixed tables of star types and body sprites.
//!
//! A stellar object only stores its sprite path; everything the generator
//! needs to know about it (category, radius, mass) is looked up here.

use rand::Rng;
use std::collections::BTreeSet;

/// Stellar masses are stored in these units; multiply by this to get the
/// mass used for orbital periods.
pub const STAR_MASS_UNIT: f64 = 6.25;

/// A named star type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarType {
    pub name: &'static str,
    pub habitable: f64,
    mass: f64,
    pub radius: f64,
    /// Drawn by the generator; the rest only appear in hand-made systems.
    pub common: bool,
}

impl StarType {
    const fn new(name: &'static str, habitable: f64, mass: f64, radius: f64, common: bool) -> Self {
        StarType {
            name,
            habitable,
            mass,
            radius,
            common,
        }
    }

    /// Mass in orbital-period units.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass * STAR_MASS_UNIT
    }

    #[must_use]
    pub fn sprite(&self) -> String {
        format!("star/{}", self.name)
    }
}

const fn star(name: &'static str, habitable: f64, mass: f64, radius: f64) -> StarType {
    StarType::new(name, habitable, mass, radius, false)
}

const fn main_sequence(name: &'static str, value: f64, radius: f64) -> StarType {
    StarType::new(name, value, value, radius, true)
}

pub static STARS: &[StarType] = &[
    star("o-supergiant", 33450., 33450., 150.),
    star("o-giant", 22300., 22300., 100.),
    main_sequence("o0", 13720., 70.),
    main_sequence("o3", 11500., 66.),
    main_sequence("o5", 10000., 63.),
    main_sequence("o8", 8650., 60.),
    star("o-dwarf", 1325., 1325., 12.),
    star("b-supergiant", 17025., 17025., 140.),
    star("b-giant", 11350., 11350., 95.),
    main_sequence("b0", 7000., 56.),
    main_sequence("b3", 6300., 54.),
    main_sequence("b5", 5600., 52.),
    main_sequence("b8", 5000., 50.),
    star("b-dwarf", 1125., 1125., 11.),
    star("a-supergiant", 11850., 11850., 130.),
    star("a-giant", 7900., 7900., 90.),
    main_sequence("a0", 3650., 45.),
    main_sequence("a3", 3400., 44.),
    main_sequence("a5", 3200., 43.),
    main_sequence("a8", 3000., 42.),
    star("a-dwarf", 750., 750., 10.),
    star("a-eater", 1000., 800., 45.),
    star("f-supergiant", 8400., 8400., 120.),
    star("f-giant", 5600., 5600., 85.),
    main_sequence("f0", 2560., 40.),
    main_sequence("f3", 2200., 38.),
    main_sequence("f5", 1715., 35.),
    star("f5-old", 3430., 3430., 52.),
    main_sequence("f8", 1310., 32.),
    star("f-dwarf", 355., 355., 9.),
    star("g-supergiant", 6075., 6075., 110.),
    star("g-giant", 4050., 4050., 80.),
    main_sequence("g0", 1080., 30.),
    star("g0-old", 2160., 2160., 45.),
    main_sequence("g3", 700., 26.),
    main_sequence("g5", 625., 25.),
    star("g5-old", 1250., 1250., 38.),
    main_sequence("g8", 550., 24.),
    star("g-dwarf", 150., 150., 8.),
    star("k-supergiant", 4500., 4500., 105.),
    star("k-giant", 3000., 3000., 75.),
    main_sequence("k0", 490., 23.),
    star("k0-old", 980., 980., 34.),
    main_sequence("k3", 450., 22.),
    main_sequence("k5", 425., 22.),
    star("k5-old", 950., 950., 33.),
    main_sequence("k8", 370., 21.),
    star("k-dwarf", 100., 100., 7.),
    star("m-supergiant", 3450., 3450., 100.),
    star("m-giant", 2300., 2300., 70.),
    main_sequence("m0", 320., 20.),
    main_sequence("m3", 230., 18.),
    main_sequence("m5", 160., 16.),
    main_sequence("m8", 135., 15.),
    star("m-dwarf", 35., 35., 6.),
    star("l-dwarf", 30., 30., 6.),
    star("carbon", 3000., 3000., 60.),
    star("nova", 100., 5000., 40.),
    star("nova-old", 100., 5000., 40.),
    star("nova-small", 100., 5000., 25.),
    star("neutron", 100., 5000., 12.),
    star("neutron-small", 80., 2000., 8.),
    star("magnetar", 120., 5000., 14.),
    star("wr", 50000., 5000., 55.),
    star("black-hole", 100000., 100000., 80.),
    star("small-black-hole", 10000., 10000., 40.),
    star("coal-black-hole", 10000., 10000., 40.),
    star("twilight-black-hole", 100000., 10000., 80.),
    // Heavier than their habitable zone suggests, so orbits around them stay short.
    star("browndwarf-l-rogue", 10., 20., 18.),
    star("browndwarf-t-rogue", 10., 20., 16.),
    star("browndwarf-y-rogue", 10., 20., 14.),
    star("rogue-radiating", 10., 20., 20.),
    star("protostar-orange", 370., 370., 30.),
    star("protostar-yellow", 135., 135., 28.),
    star("giant", 3450., 3450., 100.),
    star("smoke ring", 0., 0., 50.),
    star("void-scar", 0., 0., 50.),
    // Fallback for sprites not listed above.
    star("default", 100., 100., 20.),
];

/// Looks up a star type by sprite path ("star/g0") or bare name ("g0").
/// Unknown names resolve to the `default` entry.
#[must_use]
pub fn star_type(sprite: &str) -> &'static StarType {
    let name = sprite.split_once('/').map_or(sprite, |(_, rest)| rest);
    STARS
        .iter()
        .find(|star| star.name == name)
        .unwrap_or(&STARS[STARS.len() - 1])
}

/// Picks one of the star types the generator uses.
pub fn random_star<R: Rng + ?Sized>(rng: &mut R) -> &'static StarType {
    let common: Vec<&'static StarType> = STARS.iter().filter(|star| star.common).collect();
    common[rng.random_range(0..common.len())]
}

/// Categories of non-star bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Terrestrial planets suited to the habitable zone.
    Habitable,
    /// Terrestrial planets for everywhere else.
    Uninhabited,
    Giant,
    Moon,
    Station,
}

/// A body sprite and its drawn radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub sprite: &'static str,
    pub radius: f64,
    pub inhabited: bool,
}

const fn plain(sprite: &'static str, radius: f64) -> Body {
    Body {
        sprite,
        radius,
        inhabited: false,
    }
}

const fn settled(sprite: &'static str, radius: f64) -> Body {
    Body {
        sprite,
        radius,
        inhabited: true,
    }
}

static HABITABLE: &[Body] = &[
    settled("planet/earth", 105.),
    settled("planet/forest0", 95.),
    plain("planet/forest1", 100.),
    plain("planet/forest2", 90.),
    settled("planet/ocean0", 110.),
    plain("planet/ocean1", 95.),
    plain("planet/ocean2", 100.),
    plain("planet/cloud0", 100.),
    settled("planet/cloud1", 85.),
    settled("planet/desert-b", 95.),
    plain("planet/tundra0", 90.),
    plain("planet/tundra1", 80.),
    settled("planet/jungle0", 100.),
    plain("planet/jungle1", 95.),
    settled("planet/rock-b", 80.),
];

static UNINHABITED: &[Body] = &[
    plain("planet/desert0", 90.),
    plain("planet/desert1", 85.),
    plain("planet/desert2", 100.),
    plain("planet/desert3", 75.),
    plain("planet/lava0", 80.),
    plain("planet/lava1", 95.),
    plain("planet/lava2", 70.),
    plain("planet/ice0", 85.),
    plain("planet/ice1", 100.),
    plain("planet/ice2", 75.),
    plain("planet/ice3", 90.),
    plain("planet/dust0", 65.),
    plain("planet/dust1", 80.),
    plain("planet/dust2", 60.),
    plain("planet/rock0", 70.),
    plain("planet/rock1", 85.),
    plain("planet/rock2", 60.),
    plain("planet/rock3", 95.),
];

static GIANTS: &[Body] = &[
    plain("planet/gas0", 200.),
    plain("planet/gas1", 180.),
    plain("planet/gas2", 240.),
    plain("planet/gas3", 160.),
    plain("planet/gas4", 220.),
    plain("planet/gas5", 150.),
    plain("planet/gas6", 210.),
    plain("planet/gas7", 175.),
    plain("planet/gas8", 230.),
    plain("planet/gas9", 190.),
    plain("planet/browndwarf0", 250.),
    plain("planet/browndwarf1", 235.),
];

static MOONS: &[Body] = &[
    plain("planet/luna", 40.),
    plain("planet/phobos", 20.),
    plain("planet/deimos", 18.),
    plain("planet/io", 38.),
    plain("planet/europa", 35.),
    plain("planet/ganymede", 50.),
    plain("planet/callisto", 46.),
    plain("planet/titan", 50.),
    plain("planet/rhea", 32.),
    plain("planet/iapetus", 30.),
    plain("planet/dione", 28.),
    plain("planet/tethys", 28.),
    plain("planet/enceladus", 24.),
    plain("planet/mimas", 20.),
    plain("planet/triton", 36.),
    plain("planet/charon", 30.),
    plain("planet/miranda", 22.),
    plain("planet/ariel", 26.),
    plain("planet/umbriel", 26.),
    plain("planet/titania", 34.),
    plain("planet/oberon", 34.),
    plain("planet/moon0", 25.),
    plain("planet/moon1", 30.),
    plain("planet/moon2", 35.),
    plain("planet/moon3", 40.),
    plain("planet/moon4", 45.),
    plain("planet/moon5", 22.),
    plain("planet/moon6", 28.),
    plain("planet/moon7", 32.),
    plain("planet/moon8", 38.),
    plain("planet/moon9", 42.),
    plain("planet/moon10", 48.),
    plain("planet/moon11", 55.),
    plain("planet/moon12", 60.),
    plain("planet/moon13", 65.),
    plain("planet/moon14", 52.),
];

static STATIONS: &[Body] = &[
    settled("planet/station0", 45.),
    settled("planet/station1", 60.),
    settled("planet/station2", 35.),
    settled("planet/station3", 70.),
    settled("planet/station4", 50.),
    settled("planet/station5", 40.),
    settled("planet/station6", 55.),
    settled("planet/station7", 80.),
];

impl BodyKind {
    #[must_use]
    pub fn bodies(self) -> &'static [Body] {
        match self {
            BodyKind::Habitable => HABITABLE,
            BodyKind::Uninhabited => UNINHABITED,
            BodyKind::Giant => GIANTS,
            BodyKind::Moon => MOONS,
            BodyKind::Station => STATIONS,
        }
    }

    const ALL: [BodyKind; 5] = [
        BodyKind::Habitable,
        BodyKind::Uninhabited,
        BodyKind::Giant,
        BodyKind::Moon,
        BodyKind::Station,
    ];
}

/// Finds the catalog entry for a body sprite.
#[must_use]
pub fn body(sprite: &str) -> Option<(BodyKind, &'static Body)> {
    BodyKind::ALL.iter().find_map(|kind| {
        kind.bodies()
            .iter()
            .find(|body| body.sprite == sprite)
            .map(|body| (*kind, body))
    })
}

/// Radius of whatever the sprite depicts; unknown sprites have no extent.
#[must_use]
pub fn radius(sprite: &str) -> f64 {
    if sprite.starts_with("star/") {
        return star_type(sprite).radius;
    }
    body(sprite).map_or(0., |(_, body)| body.radius)
}

/// Picks a body of the given kind whose sprite is not in `used`.
///
/// Drawing uniformly among the unused entries gives the same distribution as
/// redrawing until an unused one comes up, without the risk of looping
/// forever once a category runs dry.
pub fn random_unused<R: Rng + ?Sized>(
    rng: &mut R,
    kind: BodyKind,
    used: &BTreeSet<String>,
) -> Option<&'static Body> {
    let free: Vec<&'static Body> = kind
        .bodies()
        .iter()
        .filter(|body| !used.contains(body.sprite))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.random_range(0..free.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaChaRng;

    #[test]
    fn test_star_lookup() {
        assert_eq!(star_type("star/g0").name, "g0");
        assert_eq!(star_type("k5").habitable, 425.);
        assert_eq!(star_type("star/unheard-of").name, "default");
        assert_eq!(star_type("star/g0").mass(), 1080. * STAR_MASS_UNIT);
    }

    #[test]
    fn test_sprites_are_unique_across_tables() {
        let mut seen = BTreeSet::new();
        for kind in BodyKind::ALL {
            for body in kind.bodies() {
                assert!(seen.insert(body.sprite), "{} listed twice", body.sprite);
            }
        }
    }

    #[test]
    fn test_random_unused_skips_used() {
        let mut rng = ChaChaRng::seed_from_u64(7);
        let mut used: BTreeSet<String> = BodyKind::Station
            .bodies()
            .iter()
            .map(|body| body.sprite.to_string())
            .collect();
        assert!(random_unused(&mut rng, BodyKind::Station, &used).is_none());

        used.remove("planet/station3");
        let pick = random_unused(&mut rng, BodyKind::Station, &used).unwrap();
        assert_eq!(pick.sprite, "planet/station3");
    }

    #[test]
    fn test_radius_lookup() {
        assert_eq!(radius("planet/gas2"), 240.);
        assert_eq!(radius("star/o0"), 70.);
        assert_eq!(radius(""), 0.);
    }
}
