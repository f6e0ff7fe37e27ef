use std::cell::RefCell;
use std::collections::BTreeMap;

use log::warn;
use ndarray::{Array2, Array3, ArrayViewMut1, Axis};
use rayon::prelude::*;
use num_complex::Complex64;
use thread_local::ThreadLocal;

use crate::math::{chebyshev_into, chebyshev_d1_into, polynomial_cutoff};
use crate::math::{SphericalHarmonicsArray, SphericalHarmonicsCache};
use crate::descriptor::{Descriptor, DescriptorGradients, Diagnostic, DiagnosticCode};
use crate::systems::{NeighborList, NeighborOptions, UnitCell};
use crate::{Error, System, Vector3D};

use super::{CalculationOptions, SpeciesTable};

mod parameters;
pub use self::parameters::SphericalChebyshevParameters;

/// Chebyshev polynomials and their derivatives for a single pair
#[derive(Debug, Clone)]
struct ChebyshevCache {
    values: Vec<f64>,
    derivatives: Vec<f64>,
}

impl ChebyshevCache {
    fn new(nmax: usize) -> ChebyshevCache {
        ChebyshevCache {
            values: vec![0.0; nmax + 1],
            derivatives: vec![0.0; nmax + 1],
        }
    }

    /// Evaluate the radial basis for a neighbor at the given `distance`. The
    /// polynomials are evaluated at `rcut - distance`, mapped from
    /// `[0, rcut]` to `[-1, 1]`.
    fn compute(&mut self, distance: f64, rcut: f64, gradients: bool) {
        chebyshev_into(rcut - distance, 0.0, rcut, &mut self.values);
        if gradients {
            chebyshev_d1_into(rcut - distance, 0.0, rcut, &mut self.derivatives);
        }
    }
}

/// A neighbor inside the cutoff radius of a central atom
struct Neighbor {
    /// index of the neighbor in the system
    atom: usize,
    /// vector from the center to (the image of) the neighbor
    vector: Vector3D,
    distance: f64,
    /// spin of the neighbor type, as a floating point number
    spin: f64,
}

/// Result of the calculation for a single center
struct CenterContribution {
    isolated: bool,
    /// gradients of the row for this center with respect to the position of
    /// other atoms, with shape `(3, features)`
    gradients: BTreeMap<usize, Array2<f64>>,
}

/// Calculator for the spherical Chebyshev descriptor.
///
/// For each atom `i`, the neighbors `j` closer than `rcut` contribute to the
/// expansion coefficients
///
/// `C[n, l, m] = \sum_j f_c(r_ij) T_n(rcut - r_ij) Y_l^m(\vec r_ij)`
///
/// where `f_c` is the polynomial cutoff function, `T_n` the Chebyshev
/// polynomials of the first kind (mapped to `[0, rcut]`) and `Y_l^m` the
/// complex spherical harmonics. The descriptor contains the power spectrum
/// `4π / (2l + 1) \sum_m |C[n, l, m]|^2` at index `n * (lmax + 1) + l`.
///
/// With more than one atomic type, the coefficients of the spin channel are
/// computed with an additional `spin(type_j)` factor for each neighbor, and
/// the corresponding power spectrum is stored in the second half of the row.
pub struct SphericalChebyshev {
    parameters: SphericalChebyshevParameters,
    species: SpeciesTable,
    neighbors: NeighborList,
    /// `4π / (2l + 1)` for all `l`
    normalization: Vec<f64>,
    chebyshev: ThreadLocal<RefCell<ChebyshevCache>>,
    spherical_harmonics: ThreadLocal<RefCell<SphericalHarmonicsCache>>,
}

impl std::fmt::Debug for SphericalChebyshev {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.parameters)
    }
}

impl SphericalChebyshev {
    /// Create a new calculator with the given parameters, and the default
    /// neighbor list options
    pub fn new(parameters: SphericalChebyshevParameters) -> Result<SphericalChebyshev, Error> {
        SphericalChebyshev::with_options(parameters, NeighborOptions::default())
    }

    /// Create a new calculator with the given parameters and neighbor list
    /// options
    pub fn with_options(parameters: SphericalChebyshevParameters, options: NeighborOptions) -> Result<SphericalChebyshev, Error> {
        parameters.validate()?;
        let species = SpeciesTable::new(&parameters.atom_types)?;
        let neighbors = NeighborList::new(options)?;

        let normalization = (0..=parameters.lmax)
            .map(|l| 4.0 * std::f64::consts::PI / (2 * l + 1) as f64)
            .collect();

        return Ok(SphericalChebyshev {
            parameters: parameters,
            species: species,
            neighbors: neighbors,
            normalization: normalization,
            chebyshev: ThreadLocal::new(),
            spherical_harmonics: ThreadLocal::new(),
        });
    }

    /// Get the parameters used to create this calculator
    pub fn parameters(&self) -> &SphericalChebyshevParameters {
        &self.parameters
    }

    /// Get the table of atomic types used by this calculator
    pub fn species(&self) -> &SpeciesTable {
        &self.species
    }

    /// Get the neighbor list used by this calculator
    pub fn neighbors(&self) -> &NeighborList {
        &self.neighbors
    }

    /// Get the number of features in each row of the descriptor
    pub fn features_count(&self) -> usize {
        self.parameters.features_count()
    }

    /// Compute the descriptor for all atoms in the `system`, without
    /// gradients.
    pub fn evaluate(&mut self, system: &dyn System) -> Result<Descriptor, Error> {
        self.compute(system, CalculationOptions::default())
    }

    /// Compute the descriptor for all atoms in the `system`.
    ///
    /// The types of all atoms are checked against the known types before
    /// anything else. Atoms without neighbors inside the cutoff get a row
    /// filled with zeros and an `IsolatedAtom` diagnostic.
    #[time_graph::instrument(name = "SphericalChebyshev::compute")]
    pub fn compute(&mut self, system: &dyn System, options: CalculationOptions) -> Result<Descriptor, Error> {
        let types = self.species.types(system)?;

        let cutoffs = vec![self.parameters.rcut / 2.0; types.len()];
        self.neighbors.update(system, &cutoffs)?;

        let positions = system.positions()?;
        let cell = system.cell()?;
        let spins = self.species.spins();
        let spins = types.iter().map(|&t| spins[t] as f64).collect::<Vec<_>>();

        let mut values = Array2::zeros((types.len(), self.features_count()));
        let contributions = values.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .map(|(center, row)| -> Result<CenterContribution, Error> {
                let neighbors = self.neighbors_inside_cutoff(center, positions, &cell, &spins)?;
                return Ok(self.compute_center(center, &neighbors, row, options.gradients));
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let mut diagnostics = Vec::new();
        for (center, contribution) in contributions.iter().enumerate() {
            if contribution.isolated {
                warn!("atom {} has no neighbor inside the cutoff radius ({})", center, self.parameters.rcut);
                diagnostics.push(Diagnostic {
                    code: DiagnosticCode::IsolatedAtom,
                    atom: center,
                });
            }
        }

        let gradients = if options.gradients {
            Some(self.collect_gradients(contributions))
        } else {
            None
        };

        return Ok(Descriptor {
            values: values,
            gradients: gradients,
            diagnostics: diagnostics,
        });
    }

    /// Get all the neighbors of `center` closer than the cutoff radius
    #[allow(clippy::float_cmp)]
    fn neighbors_inside_cutoff(
        &self,
        center: usize,
        positions: &[Vector3D],
        cell: &UnitCell,
        spins: &[f64],
    ) -> Result<Vec<Neighbor>, Error> {
        let rcut = self.parameters.rcut;
        let (atoms, shifts) = self.neighbors.neighbors_of(center);

        let mut neighbors = Vec::with_capacity(atoms.len());
        for (&atom, &shift) in atoms.iter().zip(shifts) {
            let vector = positions[atom] + cell.shift_vector(shift) - positions[center];
            let distance = vector.norm();
            if distance > rcut {
                continue;
            }

            if distance == 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "atoms {} and {} are at the same position", center, atom
                )));
            }

            neighbors.push(Neighbor {
                atom: atom,
                vector: vector,
                distance: distance,
                spin: spins[atom],
            });
        }

        return Ok(neighbors);
    }

    /// Compute the row of the descriptor for a single center from the list
    /// of its neighbors, and the corresponding gradients if requested.
    #[allow(clippy::needless_range_loop)]
    fn compute_center(
        &self,
        center: usize,
        neighbors: &[Neighbor],
        mut row: ArrayViewMut1<'_, f64>,
        gradients: bool,
    ) -> CenterContribution {
        let mut contribution = CenterContribution {
            isolated: neighbors.is_empty(),
            gradients: BTreeMap::new(),
        };

        if neighbors.is_empty() {
            return contribution;
        }

        let nmax = self.parameters.nmax;
        let lmax = self.parameters.lmax;
        let rcut = self.parameters.rcut;
        let spin_channel = self.species.has_spin_channel();

        let mut chebyshev = self.chebyshev.get_or(|| {
            RefCell::new(ChebyshevCache::new(nmax))
        }).borrow_mut();

        let mut spherical_harmonics = self.spherical_harmonics.get_or(|| {
            RefCell::new(SphericalHarmonicsCache::new(lmax))
        }).borrow_mut();

        let mut coefficients = vec![SphericalHarmonicsArray::new(lmax); nmax + 1];
        let mut spin_coefficients = if spin_channel {
            vec![SphericalHarmonicsArray::new(lmax); nmax + 1]
        } else {
            Vec::new()
        };

        for neighbor in neighbors {
            let (f_cut, _) = polynomial_cutoff(neighbor.distance, rcut);
            chebyshev.compute(neighbor.distance, rcut, false);
            spherical_harmonics.compute(neighbor.vector, false);

            for n in 0..=nmax {
                let radial = f_cut * chebyshev.values[n];
                for l in 0..=lmax {
                    let l = l as isize;
                    for m in -l..=l {
                        let value = radial * spherical_harmonics.values[[l, m]];
                        coefficients[n][[l, m]] += value;
                        if spin_channel {
                            spin_coefficients[n][[l, m]] += neighbor.spin * value;
                        }
                    }
                }
            }
        }

        let spin_offset = (nmax + 1) * (lmax + 1);
        for n in 0..=nmax {
            for l in 0..=lmax {
                let feature = n * (lmax + 1) + l;
                let slice = coefficients[n].slice(l as isize);
                row[feature] = self.normalization[l] * slice.iter().map(|c| c.norm_sqr()).sum::<f64>();

                if spin_channel {
                    let slice = spin_coefficients[n].slice(l as isize);
                    row[spin_offset + feature] = self.normalization[l] * slice.iter().map(|c| c.norm_sqr()).sum::<f64>();
                }
            }
        }

        if !gradients {
            return contribution;
        }

        let features_count = self.features_count();
        for neighbor in neighbors {
            let (f_cut, f_cut_derivative) = polynomial_cutoff(neighbor.distance, rcut);
            chebyshev.compute(neighbor.distance, rcut, true);
            spherical_harmonics.compute(neighbor.vector, true);

            let direction = neighbor.vector / neighbor.distance;

            // gradient with respect to the neighbor position
            let mut gradient = Array2::zeros((3, features_count));
            for n in 0..=nmax {
                let radial = f_cut * chebyshev.values[n];
                // the polynomials are evaluated at rcut - distance
                let radial_derivative = f_cut_derivative * chebyshev.values[n] - f_cut * chebyshev.derivatives[n];

                for l in 0..=lmax {
                    let feature = n * (lmax + 1) + l;
                    let factor = 2.0 * self.normalization[l];

                    let l = l as isize;
                    for m in -l..=l {
                        let sph_value = spherical_harmonics.values[[l, m]];
                        let conj_coefficient = coefficients[n][[l, m]].conj();

                        for d in 0..3 {
                            let d_coefficient: Complex64 = radial_derivative * direction[d] * sph_value
                                + radial * spherical_harmonics.gradients[d][[l, m]];

                            gradient[[d, feature]] += factor * (conj_coefficient * d_coefficient).re;
                            if spin_channel {
                                let conj_spin = spin_coefficients[n][[l, m]].conj();
                                gradient[[d, spin_offset + feature]] += factor * neighbor.spin * (conj_spin * d_coefficient).re;
                            }
                        }
                    }
                }
            }

            // several images of the same atom contribute to the same gradient
            *contribution.gradients.entry(neighbor.atom)
                .or_insert_with(|| Array2::zeros((3, features_count))) += &gradient;

            // the central atom moves all its neighbors in the opposite direction
            *contribution.gradients.entry(center)
                .or_insert_with(|| Array2::zeros((3, features_count))) -= &gradient;
        }

        return contribution;
    }

    /// Gather the gradients of all centers in a single `DescriptorGradients`
    fn collect_gradients(&self, contributions: Vec<CenterContribution>) -> DescriptorGradients {
        let features_count = self.features_count();
        let n_samples = contributions.iter().map(|c| c.gradients.len()).sum();

        let mut samples = Vec::with_capacity(n_samples);
        let mut values = Array3::zeros((n_samples, 3, features_count));
        for (center, contribution) in contributions.into_iter().enumerate() {
            for (atom, gradient) in contribution.gradients {
                values.index_axis_mut(Axis(0), samples.len()).assign(&gradient);
                samples.push([center, atom]);
            }
        }

        return DescriptorGradients {
            samples: samples,
            values: values,
        };
    }
}
