//! Benchmarks for feature encoding
//!
//! Run with: cargo bench --package features

use criterion::{criterion_group, criterion_main, Criterion};
use features::{FeatureEncoder, Genre, MovieAttributes, YesNo};
use std::hint::black_box;

fn sample_attributes() -> MovieAttributes {
    MovieAttributes {
        budget: 180_000_000,
        running_time: 142,
        release_month: 12,
        release_year: 2019,
        director_popularity: 410_000_000,
        lead_actor_popularity: 275_000_000,
        holiday_season: YesNo::Yes,
        has_sequel: YesNo::Yes,
        franchise: "Star Wars".to_string(),
        genres: vec![Genre::Action, Genre::Adventure, Genre::SciFi, Genre::Fantasy],
    }
}

fn bench_encode(c: &mut Criterion) {
    let encoder = FeatureEncoder::new();
    let attrs = sample_attributes();

    c.bench_function("encode_movie_attributes", |b| {
        b.iter(|| {
            let record = encoder.encode(black_box(&attrs));
            black_box(record)
        })
    });
}

fn bench_validate(c: &mut Criterion) {
    let attrs = sample_attributes();

    c.bench_function("validate_movie_attributes", |b| {
        b.iter(|| black_box(&attrs).validate())
    });
}

criterion_group!(benches, bench_encode, bench_validate);
criterion_main!(benches);
