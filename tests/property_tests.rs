//! Property-based tests for the text round trip and the generator's layout
//! guarantees under arbitrary seeds and edit sequences.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use skyfile::{DataFile, DataNode, DataWriter, System, WriterOptions, MIN_GAP, MIN_MOON_GAP};

const EPSILON: f64 = 1e-6;

// Tokens may not mix both quote characters, and never contain a line break.
fn token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .#\"-]{0,10}"
}

fn node_tree() -> impl Strategy<Value = DataNode> {
    let leaf = prop::collection::vec(token(), 1..4).prop_map(DataNode::new);
    leaf.prop_recursive(3, 32, 4, |inner| {
        (
            prop::collection::vec(token(), 1..4),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tokens, children)| {
                children
                    .into_iter()
                    .fold(DataNode::new(tokens), DataNode::with_child)
            })
    })
}

#[derive(Clone, Debug)]
enum Edit {
    AddPlanet,
    AddMoon(prop::sample::Index, bool),
    Delete(prop::sample::Index),
    ChangeSprite(prop::sample::Index),
    Move(prop::sample::Index, f64, f64),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        Just(Edit::AddPlanet),
        (any::<prop::sample::Index>(), any::<bool>()).prop_map(|(i, s)| Edit::AddMoon(i, s)),
        any::<prop::sample::Index>().prop_map(Edit::Delete),
        any::<prop::sample::Index>().prop_map(Edit::ChangeSprite),
        (any::<prop::sample::Index>(), -400.0..400.0f64, -180.0..180.0f64)
            .prop_map(|(i, d, a)| Edit::Move(i, d, a)),
    ]
}

fn pick(system: &System, index: &prop::sample::Index) -> Option<usize> {
    let candidates: Vec<usize> = (0..system.objects().len())
        .filter(|&it| !system.objects()[it].is_star())
        .collect();
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[index.index(candidates.len())])
    }
}

fn apply(system: &mut System, edit: &Edit, rng: &mut ChaChaRng) {
    match edit {
        Edit::AddPlanet => {
            system.add_planet(rng);
        }
        Edit::AddMoon(index, is_station) => {
            if let Some(index) = pick(system, index) {
                system.add_moon(index, *is_station, rng);
            }
        }
        Edit::Delete(index) => {
            if let Some(index) = pick(system, index) {
                system.delete(index);
            }
        }
        Edit::ChangeSprite(index) => {
            if let Some(index) = pick(system, index) {
                system.change_sprite(index, rng);
            }
        }
        Edit::Move(index, distance, angle) => {
            if let Some(index) = pick(system, index) {
                system.move_object(index, *distance, *angle);
            }
        }
    }
}

fn check_layout(system: &System) -> Result<(), TestCaseError> {
    let objects = system.objects();

    for (index, object) in objects.iter().enumerate() {
        if let Some(parent) = object.parent() {
            prop_assert!(parent < index, "parent {} of {}", parent, index);
            // Subtrees are contiguous.
            for between in &objects[parent + 1..index] {
                prop_assert!(between.parent().is_some_and(|it| it >= parent));
            }
        }
    }

    let mut sprites = std::collections::BTreeSet::new();
    for object in objects {
        prop_assert!(sprites.insert(object.sprite()), "duplicate {}", object.sprite());
    }

    let mut edge = system.star_radius();
    for index in (0..objects.len()).filter(|&it| objects[it].is_root() && !objects[it].is_star()) {
        let root = &objects[index];
        let occupied = system.occupied_radius_of(index);
        prop_assert!(
            root.distance() - occupied - edge >= MIN_GAP - EPSILON,
            "root {} too close: inner edge {} after {}",
            index,
            root.distance() - occupied,
            edge
        );
        edge = root.distance() + occupied;

        let mut moon_edge = root.radius();
        for moon in objects[index + 1..].iter().filter(|it| it.parent() == Some(index)) {
            prop_assert!(
                moon.distance() - moon.radius() - moon_edge >= MIN_MOON_GAP - EPSILON,
                "moon of {} too close",
                index
            );
            moon_edge = moon.distance() + moon.radius();
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_node_tree_round_trip(nodes in prop::collection::vec(node_tree(), 0..6)) {
        let mut file = DataWriter::new(WriterOptions::default());
        for node in &nodes {
            file.write_node(node);
        }
        let text = file.into_inner();
        let parsed = DataFile::parse(&text);
        prop_assert_eq!(parsed.root().children(), nodes.as_slice(), "text was:\n{}", text);
        prop_assert_eq!(parsed.comments(), "");
    }

    #[test]
    fn prop_tokenize_never_panics(line in "\\PC{0,40}") {
        let _ = skyfile::tokenize(&line);
    }

    #[test]
    fn prop_randomized_layout(seed in any::<u64>()) {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let mut system = System::named("Proptest");
        system.randomize(&mut rng, true, false);
        check_layout(&system)?;
    }

    #[test]
    fn prop_edits_keep_layout(
        seed in any::<u64>(),
        edits in prop::collection::vec(edit(), 1..24),
    ) {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let mut system = System::named("Proptest");
        system.randomize(&mut rng, true, false);
        for edit in &edits {
            apply(&mut system, edit, &mut rng);
            check_layout(&system)?;
        }
    }

    #[test]
    fn prop_system_save_reload(seed in any::<u64>()) {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let system = System::generate("Reload", skyfile::Point::new(1., 2.), &mut rng);

        let mut file = DataWriter::new(WriterOptions::default());
        system.save(&mut file);
        let text = file.into_inner();
        let reloaded = System::from_node(&DataFile::parse(&text).root().children()[0]);

        prop_assert_eq!(reloaded.objects(), system.objects());
        prop_assert_eq!(reloaded.asteroids(), system.asteroids());
        prop_assert_eq!(reloaded.minables(), system.minables());
    }
}
