use criterion::{black_box, criterion_group, criterion_main, Criterion};
use petgraph::graph::NodeIndex;

use molkey::{canonical_ranks, from_idcode, to_idcode, Atom, Bond, Mol, Neighbours, PerceptionOptions, RingCollection};

fn alkane(len: usize) -> Mol<Atom, Bond> {
    let mut mol = Mol::with_capacity(len, len.saturating_sub(1));
    for i in 0..len {
        let a = mol.add_atom(Atom::new(6));
        if i > 0 {
            mol.add_bond(NodeIndex::new(i - 1), a, Bond::single());
        }
    }
    mol
}

/// Linear acene with `rings` fused benzene rings in Kekulé form.
fn acene(rings: usize) -> Mol<Atom, Bond> {
    let width = 2 * rings + 1;
    let mut mol = Mol::with_capacity(2 * width, 5 * rings + 1);
    for _ in 0..2 * width {
        mol.add_atom(Atom::new(6));
    }
    let top = |i: usize| NodeIndex::new(i);
    let bottom = |i: usize| NodeIndex::new(width + i);
    for i in 0..width - 1 {
        let order = if i % 2 == 0 { Bond::double() } else { Bond::single() };
        mol.add_bond(top(i), top(i + 1), order.clone());
        mol.add_bond(bottom(i), bottom(i + 1), order);
    }
    for i in (0..width).step_by(2) {
        let order = if i == width - 1 { Bond::double() } else { Bond::single() };
        mol.add_bond(top(i), bottom(i), order);
    }
    mol
}

/// Phenyl rings joined by single bonds.
fn polyphenylene(rings: usize) -> Mol<Atom, Bond> {
    let mut mol = Mol::with_capacity(6 * rings, 7 * rings);
    for r in 0..rings {
        let base = 6 * r;
        for _ in 0..6 {
            mol.add_atom(Atom::new(6));
        }
        for i in 0..6 {
            let order = if i % 2 == 0 { Bond::double() } else { Bond::single() };
            mol.add_bond(NodeIndex::new(base + i), NodeIndex::new(base + (i + 1) % 6), order);
        }
        if r > 0 {
            mol.add_bond(NodeIndex::new(base - 3), NodeIndex::new(base), Bond::single());
        }
    }
    mol
}

fn bench_encode(c: &mut Criterion) {
    let decane = alkane(10);
    let anthracene = acene(3);
    let pentacene = acene(5);
    let sexiphenyl = polyphenylene(6);

    let mut group = c.benchmark_group("encode");

    group.bench_function("decane", |b| b.iter(|| black_box(to_idcode(black_box(&decane)))));
    group.bench_function("anthracene", |b| {
        b.iter(|| black_box(to_idcode(black_box(&anthracene))))
    });
    group.bench_function("pentacene", |b| {
        b.iter(|| black_box(to_idcode(black_box(&pentacene))))
    });
    group.bench_function("sexiphenyl", |b| {
        b.iter(|| black_box(to_idcode(black_box(&sexiphenyl))))
    });

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let decane = to_idcode(&alkane(10));
    let pentacene = to_idcode(&acene(5));
    let sexiphenyl = to_idcode(&polyphenylene(6));

    let mut group = c.benchmark_group("decode");

    group.bench_function("decane", |b| {
        b.iter(|| black_box(from_idcode(black_box(decane.as_str())).unwrap()))
    });
    group.bench_function("pentacene", |b| {
        b.iter(|| black_box(from_idcode(black_box(pentacene.as_str())).unwrap()))
    });
    group.bench_function("sexiphenyl", |b| {
        b.iter(|| black_box(from_idcode(black_box(sexiphenyl.as_str())).unwrap()))
    });

    group.finish();
}

fn bench_ranks(c: &mut Criterion) {
    let ring_mode = PerceptionOptions::default().ring_mode;
    let pentacene = acene(5);
    let neighbours = Neighbours::new(&pentacene);
    let rings = RingCollection::perceive(&pentacene, &neighbours, ring_mode);

    c.bench_function("canonical_ranks_pentacene", |b| {
        b.iter(|| black_box(canonical_ranks(black_box(&pentacene), &neighbours, &rings)))
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_ranks);
criterion_main!(benches);
