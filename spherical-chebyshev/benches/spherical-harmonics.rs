use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use spherical_chebyshev::Vector3D;
use spherical_chebyshev::math::{SphericalHarmonics, SphericalHarmonicsArray};
use spherical_chebyshev::math::{spherical_harmonic, spherical_harmonic_gradient};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Random neighbor vectors, with norms between 1 and 5
fn neighbor_vectors(count: usize) -> Vec<Vector3D> {
    let mut rng = StdRng::seed_from_u64(0xb47c);
    return (0..count).map(|_| {
        let vector = Vector3D::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        vector.normalized() * rng.gen_range(1.0..5.0)
    }).collect();
}

/// Evaluating all `(l, m)` at once shares the Cartesian powers between all
/// the harmonics, while evaluating them one by one recomputes these powers
/// every time.
fn batched_vs_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("all spherical harmonics of one vector");
    group.noise_threshold(0.05);

    let vectors = neighbor_vectors(32);
    for &lmax in &[2, 4, 6, 8, 12] {
        let mut evaluator = SphericalHarmonics::new(lmax);
        let mut values = SphericalHarmonicsArray::new(lmax);
        group.bench_with_input(BenchmarkId::new("batched", lmax), &vectors, |b, vectors| b.iter(|| {
            for &vector in vectors {
                evaluator.compute(black_box(vector), &mut values, None);
            }
        }));

        let mut values = SphericalHarmonicsArray::new(lmax);
        group.bench_with_input(BenchmarkId::new("one (l, m) at a time", lmax), &vectors, |b, vectors| b.iter(|| {
            for &vector in vectors {
                for l in 0..=lmax {
                    let l_signed = l as isize;
                    for m in -l_signed..=l_signed {
                        values[[l_signed, m]] = spherical_harmonic(black_box(vector), l, m);
                    }
                }
            }
        }));
    }
}

fn batched_vs_single_gradients(c: &mut Criterion) {
    let mut group = c.benchmark_group("all spherical harmonics gradients of one vector");
    group.noise_threshold(0.05);

    let vectors = neighbor_vectors(32);
    for &lmax in &[2, 6, 12] {
        let mut evaluator = SphericalHarmonics::new(lmax);
        let mut values = SphericalHarmonicsArray::new(lmax);
        let mut gradients = [
            SphericalHarmonicsArray::new(lmax),
            SphericalHarmonicsArray::new(lmax),
            SphericalHarmonicsArray::new(lmax),
        ];
        group.bench_with_input(BenchmarkId::new("batched", lmax), &vectors, |b, vectors| b.iter(|| {
            for &vector in vectors {
                evaluator.compute(black_box(vector), &mut values, Some(&mut gradients));
            }
        }));

        group.bench_with_input(BenchmarkId::new("one (l, m) at a time", lmax), &vectors, |b, vectors| b.iter(|| {
            for &vector in vectors {
                for l in 0..=lmax {
                    let l_signed = l as isize;
                    for m in -l_signed..=l_signed {
                        let gradient = spherical_harmonic_gradient(black_box(vector), l, m);
                        for d in 0..3 {
                            gradients[d][[l_signed, m]] = gradient[d];
                        }
                    }
                }
            }
        }));
    }
}

criterion_group!(benches, batched_vs_single, batched_vs_single_gradients);
criterion_main!(benches);
