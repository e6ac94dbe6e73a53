//! Performance benchmarks for rating updates

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pairwise_rating::{elo, glicko, glicko2, MatchResult};

fn bench_elo(c: &mut Criterion) {
    c.bench_function("elo_update", |b| {
        let mut player = elo::Player::new(elo::Parameters::default()).unwrap();

        b.iter(|| {
            player.reset();
            player
                .update(black_box(1580.0), black_box(MatchResult::Win))
                .unwrap()
        });
    });
}

fn results(games: usize) -> impl Iterator<Item = (f64, f64, MatchResult)> {
    (0..games).map(|i| {
        let result = match i % 3 {
            0 => MatchResult::Win,
            1 => MatchResult::Draw,
            _ => MatchResult::Loss,
        };

        (1300.0 + (i % 7) as f64 * 60.0, 40.0 + (i % 5) as f64 * 50.0, result)
    })
}

fn bench_glicko_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("glicko_settle");

    for games in [1, 10, 100, 1000] {
        let mut player = glicko::Player::new(glicko::Parameters::default()).unwrap();
        for (rating, deviation, result) in results(games) {
            player.record_result(glicko::Rating::new(rating, deviation).unwrap(), result);
        }

        group.bench_with_input(BenchmarkId::from_parameter(games), &games, |b, _| {
            b.iter(|| black_box(player.settle()));
        });
    }

    group.finish();
}

fn bench_glicko2_settle(c: &mut Criterion) {
    let mut group = c.benchmark_group("glicko2_settle");

    for games in [1, 10, 100, 1000] {
        let mut player = glicko2::Player::new(glicko2::Parameters::default()).unwrap();
        for (rating, deviation, result) in results(games) {
            player.record_result(
                glicko2::Rating::new(rating, deviation, 0.06).unwrap(),
                result,
            );
        }

        group.bench_with_input(BenchmarkId::from_parameter(games), &games, |b, _| {
            b.iter(|| black_box(player.settle().unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_elo,
    bench_glicko_settle,
    bench_glicko2_settle
);
criterion_main!(benches);
