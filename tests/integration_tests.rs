use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use skyfile::{
    catalog, from_str, to_string, DataFile, DataWriter, EditOutcome, EntryList, MapData,
    PeriodicField, Planet, Point, RaidField, System, WriterOptions, HABITABLE_SCALE,
};

fn load_system(text: &str) -> System {
    System::from_node(&DataFile::parse(text).root().children()[0])
}

fn save_system(system: &System) -> String {
    let mut file = DataWriter::new(WriterOptions::default());
    system.save(&mut file);
    file.into_inner()
}

fn leading_stars(system: &System) -> usize {
    system.objects().iter().take_while(|it| it.is_star()).count()
}

const HUMAN_SPACE: &str = "\
# Generated by hand.
system Sol
\tpos -12.5 300
\tgovernment Republic
\tattributes core human
\tarrival
\t\tlink 500
\t\tjump 300
\thabitable 1105
\tbelt 1200
\tmusic ambient/sol
\tlink \"Alpha Centauri\"
\tlink Vega
\tasteroids \"small rock\" 12 3.2
\tminables iron 4 1.5
\ttrade Food 300
\ttrade \"Heavy Metals\" 910
\tfleet Merchants 600
\thazard \"Solar Flare\" 2000
\tweather storms
\t\tintensity 3
\tobject
\t\tsprite star/g0
\t\tperiod 10
\tobject Earth
\t\tsprite planet/earth
\t\tdistance 700
\t\tperiod 365.25
\t\toffset 35
\t\tobject Luna
\t\t\tsprite planet/luna
\t\t\tdistance 180
\t\t\tperiod 27
system \"Alpha Centauri\"
\tpos 10 290
\t\"display name\" Rigil
\tlink Sol
planet Earth
\t\"display name\" Terra
\tlandscape land/sea2
\tdescription \"The cradle of humanity.\"
\tspaceport \"Busy.\"
\tshipyard \"Basic Ships\"
\toutfitter \"Common Outfits\"
\tsecurity 0.6
planet Luna
\tgovernment Republic
event \"war begins\"
\tdate 16 11 3013
";

#[test]
fn test_sol_scenario() {
    let sol = load_system("system Sol\n\tpos 0 0\n\tgovernment Republic\n");
    assert_eq!(sol.true_name(), "Sol");
    assert_eq!(sol.position(), Point::new(0., 0.));
    assert_eq!(sol.government(), "Republic");
    assert!(!sol.has_display_name());
    assert_eq!(sol.display_name(), "Sol");
}

#[test]
fn test_arrival_serialization_scenario() {
    let mut system = System::named("Sol");
    system.set_hyper_arrival(500.);
    system.set_jump_arrival(500.);
    let text = save_system(&system);
    assert!(text.contains("\tarrival 500\n"), "{text}");

    system.set_jump_arrival(300.);
    let text = save_system(&system);
    assert!(text.contains("\tarrival\n\t\tlink 500\n\t\tjump 300\n"), "{text}");

    let back = load_system(&text);
    assert_eq!(back.hyper_arrival(), 500.);
    assert_eq!(back.jump_arrival(), 300.);
}

#[test]
fn test_full_map_round_trip() {
    let map = from_str(HUMAN_SPACE);
    assert_eq!(map.systems().len(), 2);
    assert_eq!(map.planets().len(), 2);
    assert_eq!(map.unparsed().len(), 1);
    assert_eq!(to_string(&map), HUMAN_SPACE);
}

#[test]
fn test_unknown_fields_survive() {
    let map = from_str(HUMAN_SPACE);
    let sol = map.system("Sol").unwrap();
    assert_eq!(sol.unparsed().len(), 1);
    assert_eq!(sol.unparsed()[0].keyword(), "weather");

    let text = save_system(sol);
    assert!(text.contains("\tweather storms\n\t\tintensity 3\n"));
}

#[test]
fn test_display_name_equal_to_true_name_is_omitted() {
    let mut planet = Planet::named("Earth");
    planet.set_display_name("Earth");
    let mut file = DataWriter::new(WriterOptions::default());
    planet.save(&mut file);
    assert_eq!(file.into_inner(), "planet Earth\n");
}

#[test]
fn test_loaded_values() {
    let map = from_str(HUMAN_SPACE);
    let sol = map.system("Sol").unwrap();
    assert_eq!(sol.position(), Point::new(-12.5, 300.));
    assert_eq!(sol.trade("Heavy Metals"), 910);
    assert_eq!(sol.trade("Plastic"), 0);
    assert_eq!(sol.habitable(), Some(1105.));
    assert_eq!(sol.hazards()[0].period, 2000);
    assert_eq!(sol.objects().len(), 3);
    assert_eq!(sol.objects()[2].parent(), Some(1));
    assert_eq!(sol.objects()[2].planet(), "Luna");

    let alpha = map.system("Alpha Centauri").unwrap();
    assert_eq!(alpha.display_name(), "Rigil");
    assert!(alpha.links().contains("Sol"));
}

#[test]
fn test_rename_system_rewrites_links() {
    let mut map = from_str(HUMAN_SPACE);
    map.rename_system("Alpha Centauri", "Rigil Kentaurus").unwrap();
    let sol = map.system("Sol").unwrap();
    assert!(sol.links().contains("Rigil Kentaurus"));
    assert!(!sol.links().contains("Alpha Centauri"));
    // Display names are independent of the key.
    assert_eq!(map.system("Rigil Kentaurus").unwrap().display_name(), "Rigil");
}

#[test]
fn test_list_edits_flow_into_save() {
    let mut map = from_str(HUMAN_SPACE);
    let sol = map.system_mut("Sol").unwrap();

    let fleets = sol.fleets_mut();
    let row = fleets.len();
    assert_eq!(
        fleets.apply_row_edit(row, PeriodicField::Name, "Small Pirates"),
        EditOutcome::Appended(1)
    );
    fleets.apply_row_edit(1, PeriodicField::Period, "3000");

    let raids = sol.raid_fleets_mut();
    raids.apply_row_edit(0, RaidField::Name, "Pirate Raid");
    sol.toggle_raids();

    let text = to_string(&map);
    assert!(text.contains("\tfleet \"Small Pirates\" 3000\n"));
    assert!(text.contains("\t\"no raids\"\n\traid \"Pirate Raid\" 2 0\n"));
    assert!(map.is_modified());
}

#[test]
fn test_incomplete_fleet_is_not_written() {
    let mut system = System::named("Sol");
    system
        .fleets_mut()
        .apply_row_edit(0, PeriodicField::Name, "Merchants");
    assert!(!save_system(&system).contains("fleet"));
}

#[test]
fn test_add_planet_until_full_terminates() {
    let mut rng = ChaChaRng::seed_from_u64(2024);
    let mut system = System::named("Empty");
    let mut calls = 0;
    while system.occupied_radius() < 2000. {
        let before = system.occupied_radius();
        if system.add_planet(&mut rng).is_none() {
            break;
        }
        assert!(system.occupied_radius() > before);
        calls += 1;
    }
    assert!(calls > 0);
    assert!(system.occupied_radius() >= 2000.);
    for (index, object) in system.objects().iter().enumerate() {
        if let Some(parent) = object.parent() {
            assert!(parent < index);
        }
    }
}

#[test]
fn test_change_star_to_binary_scenario() {
    let mut rng = ChaChaRng::seed_from_u64(77);
    let mut system = load_system(
        "system Test\n\tobject\n\t\tsprite star/k0\n\tobject\n\t\tsprite planet/rock2\n\t\tdistance 400\n\t\tperiod 100\n",
    );

    for _ in 0..64 {
        let planet_before = system.objects()[leading_stars(&system)].distance();
        let radius_before = system.star_radius();
        system.change_star(&mut rng);

        let stars = leading_stars(&system);
        let masses: f64 = system.objects()[..stars]
            .iter()
            .map(|it| catalog::star_type(it.sprite()).mass())
            .sum();
        assert!((system.habitable().unwrap() - masses / HABITABLE_SCALE).abs() < 1e-9);

        let delta = system.star_radius() - radius_before;
        let planet_after = system.objects()[stars].distance();
        assert!((planet_after - planet_before - delta).abs() < 1e-9);

        if stars == 2 {
            return;
        }
    }
    panic!("no binary star drawn in 64 tries");
}

#[test]
fn test_randomize_puts_stars_first() {
    for seed in 0..8 {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let mut system = System::named("Goldilocks");
        system.randomize(&mut rng, true, true);
        let stars = leading_stars(&system);
        assert!((1..=2).contains(&stars));
        assert!(system.objects()[stars..].iter().all(|it| !it.is_star()));
        assert!(system.occupied_radius() > system.star_radius());
    }
}

fn terrestrial_in_band(system: &System) -> bool {
    let zone = system.habitable_zone();
    system.objects().iter().any(|it| {
        it.is_root() && it.is_terrestrial() && it.distance() > 0.5 * zone && it.distance() < 2. * zone
    })
}

fn inhabited(system: &System) -> bool {
    system.objects().iter().any(|it| it.is_inhabited())
}

#[test]
fn test_randomize_requiring_habitable_world() {
    let mut met = 0;
    for seed in 0..24 {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let mut system = System::named("Goldilocks");
        // A false return means every attempt failed and the last was kept.
        if system.randomize(&mut rng, true, true) {
            met += 1;
            assert!(terrestrial_in_band(&system), "seed {seed}");
        }
    }
    assert!(met > 0);
}

#[test]
fn test_randomize_forbidding_inhabited_worlds() {
    let mut met = 0;
    for seed in 0..24 {
        let mut rng = ChaChaRng::seed_from_u64(seed);
        let mut system = System::named("Frontier");
        if system.randomize(&mut rng, false, true) {
            met += 1;
            assert!(!inhabited(&system), "seed {seed}");
            // Unsettled worlds in the band are fine without inhabitants.
            assert!(terrestrial_in_band(&system), "seed {seed}");
        }
    }
    assert!(met > 0);
}

#[test]
fn test_generate_fills_belt_and_asteroids() {
    let mut rng = ChaChaRng::seed_from_u64(8);
    let system = System::generate("Fresh", Point::new(-5., 5.), &mut rng);
    assert_eq!(system.true_name(), "Fresh");
    assert_eq!(system.position(), Point::new(-5., 5.));
    assert_eq!(system.belts().len(), 1);
    assert!(system.habitable().is_some());

    let mut map = MapData::new();
    map.insert_system(system).unwrap();
    let reloaded = from_str(&to_string(&map));
    let fresh = reloaded.system("Fresh").unwrap();
    assert_eq!(fresh.objects().len(), map.system("Fresh").unwrap().objects().len());
}

#[test]
fn test_set_day_moves_orbits() {
    let mut system = from_str(HUMAN_SPACE).system("Sol").unwrap().clone();
    system.set_day(0.);
    let start = system.objects()[1].position();
    system.set_day(365.25 / 2.);
    let half = system.objects()[1].position();
    assert!((start.x + half.x).abs() < 1e-6);
    assert!((start.y + half.y).abs() < 1e-6);
    assert!((start.length() - 700.).abs() < 1e-9);
}
