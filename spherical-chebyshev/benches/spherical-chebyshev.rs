#![allow(clippy::needless_return)]

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use spherical_chebyshev::{SphericalChebyshev, SphericalChebyshevParameters, CalculationOptions};
use spherical_chebyshev::{SimpleSystem, System, UnitCell, Vector3D};
use spherical_chebyshev::math::chebyshev_into;

use criterion::{BenchmarkGroup, Criterion, measurement::WallTime, SamplingMode};
use criterion::{black_box, criterion_group, criterion_main};

/// Diamond silicon super cell, with small random displacements
fn silicon_bulk(repeat: usize) -> SimpleSystem {
    let a = 5.43;
    let basis = [
        [0.0, 0.0, 0.0], [0.0, 0.5, 0.5], [0.5, 0.0, 0.5], [0.5, 0.5, 0.0],
        [0.25, 0.25, 0.25], [0.25, 0.75, 0.75], [0.75, 0.25, 0.75], [0.75, 0.75, 0.25],
    ];

    let mut rng = StdRng::seed_from_u64(0xbe7c);
    let mut system = SimpleSystem::new(UnitCell::cubic(a * repeat as f64));
    for i in 0..repeat {
        for j in 0..repeat {
            for k in 0..repeat {
                for position in &basis {
                    let position = Vector3D::new(
                        a * (i as f64 + position[0]) + 0.1 * (rng.gen::<f64>() - 0.5),
                        a * (j as f64 + position[1]) + 0.1 * (rng.gen::<f64>() - 0.5),
                        a * (k as f64 + position[2]) + 0.1 * (rng.gen::<f64>() - 0.5),
                    );
                    system.add_atom("Si", position);
                }
            }
        }
    }

    return system;
}

/// Random water-like molecular liquid, with a fixed density
fn molecular_liquid(n_molecules: usize) -> SimpleSystem {
    let mut rng = StdRng::seed_from_u64(0x1e7);
    let length = f64::cbrt(30.0 * n_molecules as f64);
    let mut system = SimpleSystem::new(UnitCell::cubic(length));
    for _ in 0..n_molecules {
        let oxygen = Vector3D::new(
            length * rng.gen::<f64>(),
            length * rng.gen::<f64>(),
            length * rng.gen::<f64>(),
        );
        system.add_atom("O", oxygen);
        system.add_atom("H", oxygen + Vector3D::new(0.0, 0.763239, -0.596309));
        system.add_atom("H", oxygen + Vector3D::new(0.0, -0.763239, -0.596309));
    }
    return system;
}

fn run_spherical_chebyshev(mut group: BenchmarkGroup<WallTime>, system: &SimpleSystem, atom_types: &[&str], gradients: bool) {
    let n_centers = system.size().unwrap();

    for &nmax in black_box(&[2, 6, 10]) {
        for &lmax in black_box(&[2, 6, 10]) {
            let mut parameters = SphericalChebyshevParameters::with_types(atom_types);
            parameters.nmax = nmax;
            parameters.lmax = lmax;
            parameters.rcut = 5.0;

            let mut calculator = SphericalChebyshev::new(parameters).unwrap();
            let options = CalculationOptions { gradients };

            group.bench_function(format!("n_max = {}, l_max = {}", nmax, lmax), |b| b.iter_custom(|repeat| {
                let start = std::time::Instant::now();
                for _ in 0..repeat {
                    calculator.compute(system, options).unwrap();
                }
                start.elapsed() / n_centers as u32
            }));
        }
    }
}

fn spherical_chebyshev(c: &mut Criterion) {
    let silicon = silicon_bulk(3);
    let liquid = molecular_liquid(64);

    let mut group = c.benchmark_group("Spherical Chebyshev (per atom)/Bulk Silicon");
    group.noise_threshold(0.05);
    group.measurement_time(std::time::Duration::from_secs(10));
    group.sampling_mode(SamplingMode::Flat);
    run_spherical_chebyshev(group, &silicon, &["Si"], false);

    let mut group = c.benchmark_group("Spherical Chebyshev (per atom)/Molecular liquid");
    group.noise_threshold(0.05);
    group.measurement_time(std::time::Duration::from_secs(10));
    group.sampling_mode(SamplingMode::Flat);
    run_spherical_chebyshev(group, &liquid, &["H", "O"], false);

    let mut group = c.benchmark_group("Spherical Chebyshev with gradients (per atom)/Molecular liquid");
    group.noise_threshold(0.05);
    group.measurement_time(std::time::Duration::from_secs(10));
    group.sampling_mode(SamplingMode::Flat);
    run_spherical_chebyshev(group, &liquid, &["H", "O"], true);
}

fn chebyshev(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chebyshev polynomials (per neighbor)");
    group.noise_threshold(0.05);

    for &nmax in black_box(&[2, 6, 10, 20]) {
        let mut values = vec![0.0; nmax + 1];
        group.bench_function(format!("n_max = {}", nmax), |b| b.iter(|| {
            chebyshev_into(black_box(1.234), 0.0, 5.0, &mut values);
        }));
    }
}

criterion_group!(all, spherical_chebyshev, chebyshev);
criterion_main!(all);
