use criterion::{Criterion, black_box, criterion_group, criterion_main};
use growvec::GrowVec;
use rand::{Rng, rng};

fn push_benchmark_growvec(c: &mut Criterion) {
    c.bench_function("growvec push", |c| {
        c.iter(|| {
            let mut growvec = GrowVec::<u32>::new();
            for i in 0..(1 << 20) {
                growvec.push(i);
            }
        });
    });
}

fn push_benchmark_vec(c: &mut Criterion) {
    c.bench_function("vec push", |c| {
        c.iter(|| {
            let mut vec = Vec::<u32>::new();
            for i in 0..(1 << 20) {
                vec.push(i);
            }
        });
    });
}

fn insert_benchmark_growvec(c: &mut Criterion) {
    let mut rng = rng();
    let positions: Vec<usize> = (0..4096).map(|len| rng.random_range(0..=len)).collect();

    c.bench_function("growvec insert", |c| {
        c.iter(|| {
            let mut growvec = GrowVec::<u32>::new();
            for (i, &ix) in positions.iter().enumerate() {
                let _ = growvec.insert(ix, i as u32);
            }
        });
    });

    c.bench_function("vec insert", |c| {
        c.iter(|| {
            let mut vec = Vec::<u32>::new();
            for (i, &ix) in positions.iter().enumerate() {
                vec.insert(ix, i as u32);
            }
        });
    });
}

fn growvec_iter_bench(c: &mut Criterion) {
    let growvec: GrowVec<u32> = (0..(1 << 20)).collect();

    c.bench_function("growvec iter", |c| {
        c.iter(|| {
            growvec.iter().for_each(|x| {
                black_box(x);
            });
        });
    });
}

criterion_group!(
    benches,
    push_benchmark_growvec,
    push_benchmark_vec,
    insert_benchmark_growvec,
    growvec_iter_bench
);
criterion_main!(benches);
