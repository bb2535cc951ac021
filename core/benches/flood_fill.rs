use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use estallido_core::*;

fn bench_open_set(c: &mut Criterion) {
    // sparse board, most of it one connected double-safe region
    let mines: Vec<Coord2> = (0..16u16)
        .map(|i| (((i * 13) % 96) as u8, ((i * 29) % 96) as u8))
        .collect();
    let board = Board::from_mine_coords((96, 96), &mines).unwrap();
    let cover = CoverGrid::from_elem((96, 96).to_nd_index(), true);

    c.bench_function("open_set 96x96 sparse", |b| {
        b.iter(|| open_set(black_box(&board), black_box(&cover), black_box((48, 48))))
    });

    let clear = Board::from_mine_coords((96, 96), &[]).unwrap();
    c.bench_function("open_set 96x96 clear", |b| {
        b.iter(|| open_set(black_box(&clear), black_box(&cover), black_box((0, 0))))
    });
}

fn bench_loss_schedule(c: &mut Criterion) {
    let mines: Vec<Coord2> = (0..64u8)
        .flat_map(|x| (0..64u8).map(move |y| (x, y)))
        .filter(|&(x, y)| (x ^ y) % 5 == 0)
        .collect();
    let board = Board::from_mine_coords((64, 64), &mines).unwrap();
    let flags = FlagGrid::default((64, 64).to_nd_index());

    c.bench_function("build_schedule 64x64", |b| {
        b.iter(|| build_schedule(black_box(&board), black_box(&flags), (32, 32), 0))
    });
}

criterion_group!(benches, bench_open_set, bench_loss_schedule);
criterion_main!(benches);
