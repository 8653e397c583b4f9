//! Procedural generation and layout-preserving edits of a system's objects.
//!
//! Objects are laid out outward from the star(s). Each root object claims a
//! ring from `distance - occupied` to `distance + occupied`, where the
//! occupied radius covers the body and all its moons. Edits keep at least
//! [`MIN_GAP`] between neighbouring rings and [`MIN_MOON_GAP`] between
//! neighbouring moons by shifting everything farther out.
//!
//! All randomness comes from the caller's generator, so a seeded generator
//! reproduces a system exactly.
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaChaRng;
//! use skyfile::System;
//!
//! let mut rng = ChaChaRng::seed_from_u64(3);
//! let mut system = System::named("Nova");
//! system.randomize(&mut rng, true, false);
//! assert!(system.objects()[0].is_star());
//! assert!(system.occupied_radius() >= 2000.);
//! ```

use crate::catalog::{self, BodyKind};
use crate::{Asteroid, Belt, GeneratorOptions, Minable, Point, StellarObject, System};
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Stellar mass divided by this gives the default habitable distance.
pub const HABITABLE_SCALE: f64 = 6.25;
/// Smallest gap between neighbouring root rings.
pub const MIN_GAP: f64 = 50.;
/// Upper bound of the extra random spacing for the first planet.
pub const RANDOM_GAP: u32 = 100;
/// Smallest gap between a moon and its inward neighbour.
pub const MIN_MOON_GAP: f64 = 10.;
/// Upper bound of the extra random spacing for the first moon.
pub const RANDOM_MOON_GAP: u32 = 50;
/// Planets smaller than this never get moons.
const MIN_MOON_HOST_RADIUS: f64 = 70.;
/// Binary separation beyond the two star radii is at least this...
const MIN_STAR_DISTANCE: f64 = 40.;
/// ...plus up to this much more.
const RANDOM_STAR_DISTANCE: u32 = 40;
/// Rough mass per cubic unit of a planet's radius, for initial moon periods.
const PLANET_MASS_SCALE: f64 = 0.015;

const ASTEROID_PREFIXES: [&str; 3] = ["small ", "medium ", "large "];
const ASTEROID_SUFFIXES: [&str; 2] = ["rock", "metal"];

/// Relative odds (out of 100) of each minable, in name order.
const MINABLE_ODDS: [(&str, i32); 12] = [
    ("aluminum", 12),
    ("copper", 8),
    ("gold", 2),
    ("iron", 13),
    ("lead", 15),
    ("neodymium", 3),
    ("platinum", 1),
    ("silicon", 2),
    ("silver", 5),
    ("titanium", 11),
    ("tungsten", 6),
    ("uranium", 4),
];

impl System {
    /// A freshly generated system at `position`, with its belt, asteroids
    /// and minables filled in.
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(name: impl Into<String>, position: Point, rng: &mut R) -> Self {
        let mut system = System::named(name);
        system.set_position(position);
        system.randomize(rng, true, false);
        system.change_asteroids(rng);
        system.change_minables(rng);
        system
    }

    /// Regenerates every object with the default [`GeneratorOptions`].
    pub fn randomize<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        allow_habitable: bool,
        require_habitable: bool,
    ) -> bool {
        self.randomize_with(rng, allow_habitable, require_habitable, &GeneratorOptions::default())
    }

    /// Regenerates every object, retrying until the habitable-zone
    /// constraints hold.
    ///
    /// Without `allow_habitable` no body may be inhabited
    /// ([`System::has_inhabited_body`]); with `require_habitable` a
    /// terrestrial root must orbit inside the habitable band
    /// ([`System::has_habitable_terrestrial`]). Returns `false` if no
    /// attempt satisfied them, in which case the last candidate is kept.
    pub fn randomize_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        allow_habitable: bool,
        require_habitable: bool,
        options: &GeneratorOptions,
    ) -> bool {
        let attempts = options.max_attempts.max(1);
        for attempt in 1..=attempts {
            self.objects.clear();
            self.change_star(rng);
            while self.occupied_radius() < options.occupied_limit {
                if self.add_planet(rng).is_none() {
                    debug!(system = self.true_name(), "body catalog exhausted");
                    break;
                }
            }

            let inhabited = self.has_inhabited_body();
            let habitable = self.has_habitable_terrestrial();
            if (allow_habitable || !inhabited) && (!require_habitable || habitable) {
                debug!(system = self.true_name(), attempt, objects = self.objects.len(), "generated system");
                return true;
            }
        }
        debug!(
            system = self.true_name(),
            attempts, "no candidate met the habitable constraints; keeping the last"
        );
        false
    }

    /// Any settled planet or station, wherever it orbits.
    #[must_use]
    pub fn has_inhabited_body(&self) -> bool {
        self.objects.iter().any(StellarObject::is_inhabited)
    }

    /// A terrestrial root object inside the habitable band.
    #[must_use]
    pub fn has_habitable_terrestrial(&self) -> bool {
        let zone = self.habitable_zone();
        self.objects.iter().any(|object| {
            object.is_root()
                && object.is_terrestrial()
                && object.distance > 0.5 * zone
                && object.distance < 2. * zone
        })
    }

    /// Replaces the leading star(s) with one or two random stars. The two
    /// stars of a binary never share a sprite.
    ///
    /// The habitable distance is reset from the new stars' mass alone, and
    /// every other root object moves by the change in the stars' outer radius,
    /// so the gap to the first planet is unchanged.
    pub fn change_star<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let old_radius = self.star_radius();
        let old_count = self.leading_star_count();
        self.objects.drain(..old_count);

        let stars = if rng.random_range(0..3) == 0 {
            binary_stars(rng)
        } else {
            vec![single_star(rng)]
        };
        let new_count = stars.len();
        let mass: f64 = stars
            .iter()
            .map(|star| catalog::star_type(&star.sprite).mass())
            .sum();
        for object in &mut self.objects {
            if let Some(parent) = object.parent.as_mut() {
                *parent = if *parent < old_count {
                    (*parent).min(new_count - 1)
                } else {
                    *parent - old_count + new_count
                };
            }
        }
        let mut objects = stars;
        objects.append(&mut self.objects);
        self.objects = objects;

        self.habitable = Some(mass / HABITABLE_SCALE);
        let delta = self.star_radius() - old_radius;
        for index in new_count..self.objects.len() {
            if self.objects[index].is_root() {
                self.shift(index, delta);
            }
        }
        trace!(stars = new_count, delta, "changed star");
    }

    /// Adds one planet (with random moons) beyond everything else.
    ///
    /// Returns the new planet's index, or `None` if every body sprite is
    /// already in use.
    pub fn add_planet<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let planets = self
            .objects
            .iter()
            .filter(|it| it.is_root() && !it.is_star())
            .count();
        let mut random_space = RANDOM_GAP;
        for _ in 0..planets {
            random_space = random_space.saturating_add(random_space / 2);
        }
        let space = f64::from(rng.random_range(0..random_space));
        let distance = self.occupied_radius() + space * space * 0.01 + MIN_GAP;

        let zone = self.habitable_zone();
        let in_band = distance > 0.5 * zone && distance < 2. * zone - 120.;
        let is_small = rng.random_range(0..10) == 0;
        let is_terrestrial = !is_small && f64::from(rng.random_range(0..2000u32)) > distance;
        let preferred = if is_small {
            BodyKind::Moon
        } else if is_terrestrial {
            if in_band {
                BodyKind::Habitable
            } else {
                BodyKind::Uninhabited
            }
        } else {
            BodyKind::Giant
        };

        let mut used = self.used_sprites();
        let body = [preferred, BodyKind::Uninhabited, BodyKind::Giant, BodyKind::Moon]
            .into_iter()
            .find_map(|kind| catalog::random_unused(rng, kind, &used))?;
        used.insert(body.sprite.to_string());

        let root_index = self.objects.len();
        self.objects.push(StellarObject::new(body.sprite, None));

        let moon_cap = if is_terrestrial {
            rng.random_range(0..2) + 1
        } else {
            rng.random_range(0..3) + 3
        };
        let mut moon_count = rng.random_range(0..moon_cap);
        if body.radius < MIN_MOON_HOST_RADIUS {
            moon_count = 0;
        }

        let mut moon_distance = body.radius;
        let mut random_moon_space = RANDOM_MOON_GAP;
        for _ in 0..moon_count {
            moon_distance += f64::from(rng.random_range(0..random_moon_space)) + MIN_MOON_GAP;
            random_moon_space += 20;
            let kind = if rng.random_range(0..10) == 0 {
                BodyKind::Station
            } else {
                BodyKind::Moon
            };
            let Some(moon) = catalog::random_unused(rng, kind, &used)
                .or_else(|| catalog::random_unused(rng, BodyKind::Moon, &used))
            else {
                break;
            };
            used.insert(moon.sprite.to_string());

            let mut object = StellarObject::new(moon.sprite, Some(root_index));
            object.distance = moon_distance + moon.radius;
            object.period = moon_period(body.radius, object.distance);
            self.objects.push(object);
            moon_distance += 2. * moon.radius;
        }

        self.objects[root_index].distance = distance + moon_distance;
        self.recompute(root_index, false);
        trace!(sprite = body.sprite, index = root_index, "added planet");
        Some(root_index)
    }

    /// Adds a moon (or station) outside the existing moons of a root
    /// object. Objects farther out move to make room.
    ///
    /// Returns the new moon's index, or `None` if `index` is not a planet
    /// or no unused sprite is left.
    pub fn add_moon<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        is_station: bool,
        rng: &mut R,
    ) -> Option<usize> {
        let root = self.objects.get(index)?;
        if !root.is_root() || root.is_star() {
            return None;
        }
        let root_radius = root.radius();

        let mut original = root_radius;
        let mut random_space = RANDOM_MOON_GAP;
        let end = self.subtree_end(index);
        for object in &self.objects[index + 1..end] {
            if object.parent == Some(index) {
                random_space += 20;
                original = object.distance + object.radius();
            }
        }

        let kind = if is_station {
            BodyKind::Station
        } else {
            BodyKind::Moon
        };
        let moon = catalog::random_unused(rng, kind, &self.used_sprites())?;
        let moon_distance =
            original + f64::from(rng.random_range(0..random_space)) + MIN_MOON_GAP;
        let increase = moon_distance + 2. * moon.radius - original;

        for later in end..self.objects.len() {
            if self.objects[later].is_root() {
                self.shift(later, 2. * increase);
            }
        }
        self.shift(index, increase);

        let mut object = StellarObject::new(moon.sprite, Some(index));
        object.distance = moon_distance + moon.radius;
        object.period = moon_period(root_radius, object.distance);
        self.objects.insert(end, object);
        for object in &mut self.objects[end + 1..] {
            if let Some(parent) = object.parent.as_mut() {
                if *parent >= end {
                    *parent += 1;
                }
            }
        }
        Some(end)
    }

    /// Moves an object outward by `d_distance` and rotates it by `d_angle`
    /// degrees. Farther objects move with it. The move is clamped so the
    /// object keeps its minimum gap to its inward neighbour.
    ///
    /// Stars and objects with no period do not move.
    pub fn move_object(&mut self, index: usize, d_distance: f64, d_angle: f64) {
        let Some(object) = self.objects.get(index) else {
            return;
        };
        if object.period == 0. || object.is_star() {
            return;
        }

        let parent = object.parent;
        match parent {
            None => {
                let mut d = d_distance;
                if let Some(inner) = self.inner_edge_before(index) {
                    let gap = object.distance - self.occupied_radius_of(index) + d - inner;
                    if gap < MIN_GAP {
                        d += MIN_GAP - gap;
                    }
                }
                self.rotate(index, d_angle);
                for later in index..self.objects.len() {
                    if self.objects[later].is_root() {
                        self.shift(later, d);
                    }
                }
            }
            Some(parent) => {
                let mut d = d_distance;
                let inner = self.previous_sibling_edge(index, parent);
                let gap = object.distance - object.radius() + d - inner;
                if gap < MIN_MOON_GAP {
                    d += MIN_MOON_GAP - gap;
                }

                let before = self.occupied_radius_of(parent);
                self.rotate(index, d_angle);
                for later in index..self.objects.len() {
                    if self.objects[later].parent == Some(parent) {
                        self.objects[later].distance += d;
                    }
                }
                let growth = self.occupied_radius_of(parent) - before;
                if growth != 0. {
                    self.shift(parent, growth);
                    for later in parent + 1..self.objects.len() {
                        if self.objects[later].is_root() {
                            self.shift(later, 2. * growth);
                        }
                    }
                }
            }
        }
    }

    /// Swaps an object's sprite for an unused one of the same category,
    /// moving neighbours to absorb the change in radius.
    ///
    /// Terrestrial planets pick from the habitable or uninhabited list
    /// depending on where they orbit. Stars are left alone; use
    /// [`System::change_star`] for them.
    pub fn change_sprite<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) {
        let Some(object) = self.objects.get(index) else {
            return;
        };
        if object.is_star() {
            return;
        }
        let kind = match object.kind() {
            Some(BodyKind::Giant) => BodyKind::Giant,
            Some(BodyKind::Moon) => BodyKind::Moon,
            Some(BodyKind::Station) => BodyKind::Station,
            _ => {
                let zone = self.habitable_zone();
                if object.distance > 0.5 * zone && object.distance < 2. * zone {
                    BodyKind::Habitable
                } else {
                    BodyKind::Uninhabited
                }
            }
        };
        let Some(body) = catalog::random_unused(rng, kind, &self.used_sprites()) else {
            debug!(index, ?kind, "no unused sprite left");
            return;
        };

        let mut r = body.radius - object.radius();
        let parent = object.parent;
        self.objects[index].sprite = body.sprite.to_string();
        self.shift(index, r);
        if let Some(parent) = parent {
            r *= 2.;
            self.shift(parent, r);
        }

        let mut in_subtree = true;
        for later in index + 1..self.objects.len() {
            if self.objects[later].is_root() {
                if in_subtree {
                    in_subtree = false;
                    r *= 2.;
                }
                self.shift(later, r);
            } else if in_subtree {
                self.objects[later].distance += r;
            }
        }
    }

    /// Removes an object and everything orbiting it, then pulls the next
    /// object inward to close the hole (as far as the gap rules allow).
    pub fn delete(&mut self, index: usize) {
        let Some(object) = self.objects.get(index) else {
            return;
        };
        let shrink = if object.is_root() && !object.is_star() {
            self.occupied_radius_of(index)
        } else {
            object.radius()
        };
        let end = self.subtree_end(index);
        let removed = end - index;
        self.objects.drain(index..end);
        for object in &mut self.objects[index..] {
            if let Some(parent) = object.parent.as_mut() {
                if *parent >= end {
                    *parent -= removed;
                }
            }
        }
        debug!(index, removed, "deleted object");
        if index < self.objects.len() {
            self.move_object(index, -2. * shrink, 0.);
        }
    }

    /// Replaces the ordinary asteroids with a random mix.
    pub fn change_asteroids<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.asteroids.clear();

        let full_total = rng.random_range(0..21i32) * rng.random_range(0..21i32) + 1;
        let energy =
            f64::from((rng.random_range(0..21i32) + 10) * (rng.random_range(0..21i32) + 10)) * 0.01;

        let first = rng.random_range(0..full_total);
        let totals = [first, full_total - first];
        for (suffix, total) in ASTEROID_SUFFIXES.iter().zip(totals) {
            if total == 0 {
                continue;
            }
            let mut counts = [0; 3];
            counts[1] = rng.random_range(0..total);
            let remaining = total - counts[1];
            if remaining > 0 {
                counts[0] = rng.random_range(0..remaining);
                counts[2] = remaining - counts[0];
            }
            for (prefix, count) in ASTEROID_PREFIXES.iter().zip(counts) {
                if count > 0 {
                    let scaled = energy * f64::from(rng.random_range(0..101i32) + 50) * 0.01;
                    self.asteroids
                        .push(Asteroid::new(format!("{prefix}{suffix}"), count, scaled));
                }
            }
        }
    }

    /// Replaces the belt and minables. Minable counts scale with the
    /// ordinary asteroids, so run [`System::change_asteroids`] first.
    pub fn change_minables<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.belts = vec![Belt::new(f64::from(rng.random_range(0..1000i32) + 1000), 1)];
        self.minables.clear();

        let mut total_count: i32 = self.asteroids.iter().map(|it| it.count).sum();
        if total_count == 0 {
            return;
        }
        let total_energy: f64 = self
            .asteroids
            .iter()
            .map(|it| it.energy * f64::from(it.count))
            .sum();
        let mean_energy = total_energy / f64::from(total_count);

        total_count /= 4;
        let mut choices: BTreeMap<&str, i32> = BTreeMap::new();
        for _ in 0..3 {
            total_count = rng.random_range(0..=total_count);
            if total_count == 0 {
                break;
            }
            let mut choice: i32 = rng.random_range(0..100);
            for (kind, odds) in MINABLE_ODDS {
                choice -= odds;
                if choice < 0 {
                    *choices.entry(kind).or_insert(0) += total_count;
                    break;
                }
            }
        }
        for (kind, count) in choices {
            let energy = f64::from(rng.random_range(0..1000i32) + 1000) * 0.001 * mean_energy;
            self.minables.push(Minable::new(kind, count, energy));
        }
    }

    /// Recomputes a root object's period from its distance and the stellar
    /// mass. With `update_offset`, the offset is adjusted so the object is
    /// at the same angle as before on the current day.
    ///
    /// Stars, rogue bodies and moons are left alone; moon periods are only
    /// ever set explicitly.
    pub fn recompute(&mut self, index: usize, update_offset: bool) {
        let Some(object) = self.objects.get(index) else {
            return;
        };
        if object.is_star() || object.sprite.contains("rogue") || !object.is_root() {
            return;
        }
        let mass = self.stellar_mass();
        if mass <= 0. {
            return;
        }

        let time = self.time_step;
        let object = &mut self.objects[index];
        let period = (object.distance.powi(3) / mass).sqrt();
        if update_offset && object.period != 0. && period != 0. {
            let delta = time / object.period - time / period;
            object.offset += 360. * (delta - delta.floor());
            object.offset = object.offset.rem_euclid(360.);
        }
        object.period = period;
    }

    /// Sprites already used by objects in this system.
    #[must_use]
    pub fn used_sprites(&self) -> BTreeSet<String> {
        self.objects.iter().map(|it| it.sprite.clone()).collect()
    }

    /// Sum of the catalog masses of stars and rogue bodies.
    #[must_use]
    pub fn stellar_mass(&self) -> f64 {
        self.objects
            .iter()
            .filter(|it| it.is_mass_source())
            .map(|it| catalog::star_type(&it.sprite).mass())
            .sum()
    }

    /// The stored habitable distance, or one derived from the stellar mass.
    #[must_use]
    pub fn habitable_zone(&self) -> f64 {
        self.habitable
            .unwrap_or_else(|| self.stellar_mass() / HABITABLE_SCALE)
    }

    /// Outer edge of everything in the system.
    #[must_use]
    pub fn occupied_radius(&self) -> f64 {
        (0..self.objects.len())
            .filter(|&index| self.objects[index].is_root())
            .map(|index| {
                let object = &self.objects[index];
                if object.is_star() {
                    object.distance + object.radius()
                } else {
                    object.distance + self.occupied_radius_of(index)
                }
            })
            .fold(0., f64::max)
    }

    /// Half-width of the ring a root object and its moons occupy. Zero for
    /// moons, stars and bad indices.
    #[must_use]
    pub fn occupied_radius_of(&self, index: usize) -> f64 {
        let Some(object) = self.objects.get(index) else {
            return 0.;
        };
        if !object.is_root() || object.is_star() {
            return 0.;
        }
        self.objects[index + 1..]
            .iter()
            .filter(|it| it.parent == Some(index))
            .map(|it| it.distance + it.radius())
            .fold(object.radius(), f64::max)
    }

    /// Outer edge of the leading star(s).
    #[must_use]
    pub fn star_radius(&self) -> f64 {
        self.objects
            .iter()
            .take_while(|it| it.is_star())
            .map(|it| it.distance + it.radius())
            .fold(0., f64::max)
    }

    fn leading_star_count(&self) -> usize {
        self.objects.iter().take_while(|it| it.is_star()).count()
    }

    /// One past the last object in `index`'s subtree.
    fn subtree_end(&self, index: usize) -> usize {
        let mut end = index + 1;
        while end < self.objects.len()
            && self.objects[end].parent.is_some_and(|parent| parent >= index)
        {
            end += 1;
        }
        end
    }

    /// Outer edge of the nearest root object inside `index`, if there is one.
    fn inner_edge_before(&self, index: usize) -> Option<f64> {
        let previous = (0..index).rev().find(|&it| self.objects[it].is_root())?;
        let object = &self.objects[previous];
        Some(if object.is_star() {
            self.star_radius()
        } else {
            object.distance + self.occupied_radius_of(previous)
        })
    }

    /// Outer edge of the previous moon of `parent`, or the parent's surface.
    fn previous_sibling_edge(&self, index: usize, parent: usize) -> f64 {
        (parent + 1..index)
            .rev()
            .find(|&it| self.objects[it].parent == Some(parent))
            .map_or_else(
                || self.objects[parent].radius(),
                |it| self.objects[it].distance + self.objects[it].radius(),
            )
    }

    fn rotate(&mut self, index: usize, d_angle: f64) {
        let object = &mut self.objects[index];
        object.offset = (object.offset - d_angle).rem_euclid(360.);
    }

    fn shift(&mut self, index: usize, amount: f64) {
        self.objects[index].distance += amount;
        self.recompute(index, true);
    }
}

fn single_star<R: Rng + ?Sized>(rng: &mut R) -> StellarObject {
    let mut star = StellarObject::new(catalog::random_star(rng).sprite(), None);
    star.period = 10.;
    star
}

/// Two different stars orbiting their barycenter on opposite sides.
fn binary_stars<R: Rng + ?Sized>(rng: &mut R) -> Vec<StellarObject> {
    let first = catalog::random_star(rng);
    let mut second = catalog::random_star(rng);
    while second.name == first.name {
        second = catalog::random_star(rng);
    }
    let (m1, m2) = (first.mass(), second.mass());
    let total = m1 + m2;

    let separation = first.radius
        + second.radius
        + f64::from(rng.random_range(0..RANDOM_STAR_DISTANCE))
        + MIN_STAR_DISTANCE;
    let period = (separation.powi(3) / total).sqrt();

    let mut stars = [
        StellarObject::new(first.sprite(), None),
        StellarObject::new(second.sprite(), None),
    ];
    stars[0].distance = m2 * separation / total;
    stars[1].distance = m1 * separation / total;
    stars[1].offset = 180.;
    for star in &mut stars {
        star.period = period;
    }
    if stars[1].distance < stars[0].distance {
        stars.swap(0, 1);
    }
    stars.into()
}

/// A moon's period around a body of the given radius.
fn moon_period(parent_radius: f64, distance: f64) -> f64 {
    let mass = parent_radius.powi(3) * PLANET_MASS_SCALE;
    if mass <= 0. {
        return 0.;
    }
    (distance.powi(3) / mass).sqrt()
}
