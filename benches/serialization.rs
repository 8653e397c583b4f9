use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use skyfile::{from_str, to_string, DataFile, MapData, Point, System};

fn generated_map(systems: usize) -> MapData {
    let mut rng = ChaChaRng::seed_from_u64(7);
    let mut map = MapData::new();
    for index in 0..systems {
        let system = System::generate(format!("System {index}"), Point::new(index as f64, 0.), &mut rng);
        if let Err(err) = map.insert_system(system) {
            panic!("{err}");
        }
    }
    let names: Vec<String> = map.systems().keys().cloned().collect();
    for pair in names.windows(2) {
        if let Err(err) = map.toggle_link(&pair[0], &pair[1]) {
            panic!("{err}");
        }
    }
    map
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for size in [10, 100, 500].iter() {
        let text = to_string(&generated_map(*size));

        group.bench_with_input(BenchmarkId::new("nodes", size), &text, |b, text| {
            b.iter(|| DataFile::parse(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("map", size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }

    group.finish();
}

fn benchmark_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");

    for size in [10, 100, 500].iter() {
        let map = generated_map(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &map, |b, map| {
            b.iter(|| to_string(black_box(map)))
        });
    }

    group.finish();
}

fn benchmark_randomize(c: &mut Criterion) {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let mut system = System::named("Bench");

    c.bench_function("randomize_system", |b| {
        b.iter(|| system.randomize(&mut rng, true, false))
    });

    c.bench_function("randomize_habitable_system", |b| {
        b.iter(|| system.randomize(&mut rng, true, true))
    });
}

criterion_group!(benches, benchmark_parse, benchmark_write, benchmark_randomize);
criterion_main!(benches);
