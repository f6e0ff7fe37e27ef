use log::{debug, warn};
use ndarray::Array3;

use crate::{Error, Vector3D};
use super::{UnitCell, System};

/// Maximal number of cells, we need to use this to prevent having too many
/// cells with a small unit cell and a large cutoff
const MAX_NUMBER_OF_CELLS: f64 = 1e5;

/// A cell shift represents the displacement along cell axis between the actual
/// position of an atom and a periodic image of this atom.
///
/// The cell shift can be used to reconstruct the vector between two points,
/// wrapped inside the unit cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellShift(pub [i32; 3]);

impl std::ops::Add<CellShift> for CellShift {
    type Output = CellShift;

    fn add(mut self, rhs: CellShift) -> Self::Output {
        self.0[0] += rhs[0];
        self.0[1] += rhs[1];
        self.0[2] += rhs[2];
        return self;
    }
}

impl std::ops::Sub<CellShift> for CellShift {
    type Output = CellShift;

    fn sub(mut self, rhs: CellShift) -> Self::Output {
        self.0[0] -= rhs[0];
        self.0[1] -= rhs[1];
        self.0[2] -= rhs[2];
        return self;
    }
}

impl std::ops::Neg for CellShift {
    type Output = CellShift;

    fn neg(self) -> Self::Output {
        CellShift([-self[0], -self[1], -self[2]])
    }
}

impl std::ops::Index<usize> for CellShift {
    type Output = i32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl CellShift {
    /// Compute the shift vector in cartesian coordinates, using the given
    /// unit cell.
    pub fn cartesian(&self, cell: &UnitCell) -> Vector3D {
        cell.shift_vector(self.0)
    }

    fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0]
    }

    /// When creating pairs between an atom and one of its periodic images,
    /// the search generates multiple redundant pairs (e.g. with shifts 0 1 1
    /// and 0 -1 -1); and we only want to keep one of these. This returns
    /// `true` for the shift that should be kept.
    fn is_in_positive_half_space(&self) -> bool {
        let shift = self.0;
        if shift[0] + shift[1] + shift[2] < 0 {
            // drop shifts on the negative half-space
            return false;
        }

        if (shift[0] + shift[1] + shift[2] == 0)
            && (shift[2] < 0 || (shift[2] == 0 && shift[1] < 0)) {

            // drop shifts in the negative half plane or the
            // negative shift[1] axis. See below for a graphical
            // representation: we are keeping the shifts indicated
            // with `O` and dropping the ones indicated with `X`
            //
            //  O O O │ O O O
            //  O O O │ O O O
            //  O O O │ O O O
            // ─X─X─X─┼─O─O─O─
            //  X X X │ X X X
            //  X X X │ X X X
            //  X X X │ X X X
            return false;
        }

        return true;
    }
}

/// Pair produced by a [`PairSearch`]. The vector between the atoms can be
/// constructed as `position[second] - position[first] + shift.cartesian(unit_cell)`
#[derive(Debug, Clone, PartialEq)]
pub struct CellPair {
    /// index of the first atom in the pair
    pub first: usize,
    /// index of the second atom in the pair
    pub second: usize,
    /// number of shifts along the cell for this pair
    pub shift: CellShift,
}

/// Spatial pairing primitive, finding all pairs of atoms separated by at
/// most a given cutoff.
pub trait PairSearch {
    /// Get all pairs of atoms up to `cutoff` apart, accounting for the
    /// periodic boundary conditions of `cell`.
    ///
    /// This produces a so-called "half" neighbors list, where each pair is
    /// only included once, with `first <= second`. Pairs between an atom and
    /// itself are only included for periodic images (non-zero shift), and
    /// only once for each pair of opposite shifts.
    ///
    /// If two atoms are neighbors of one another more than once (this can
    /// happen when not using minimal image convention), all pairs at different
    /// distances/directions are included.
    fn pairs(&self, positions: &[Vector3D], cell: &UnitCell, cutoff: f64) -> Result<Vec<CellPair>, Error>;
}

fn check_cutoff(cutoff: f64) -> Result<(), Error> {
    if !(cutoff.is_finite() && cutoff > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "expected a positive and finite cutoff for the neighbor search, got {}", cutoff
        )));
    }
    return Ok(());
}

/// Filter a candidate pair by distance, returning `true` if it should be kept
fn check_distance(first: usize, second: usize, vector: Vector3D, cutoff2: f64) -> bool {
    let distance2 = vector.norm2();
    if distance2 <= cutoff2 {
        if distance2 < 1e-6 {
            warn!(
                "atoms {} and {} are very close to one another ({} A)",
                first, second, distance2.sqrt()
            );
        }
        return true;
    }
    return false;
}

/// Data associated with an atoms inside the `CellList`
#[derive(Debug, Clone)]
struct AtomData {
    /// index of the atom in the original system
    index: usize,
    /// the shift vector from the actual atom position to the image of this atom
    /// inside the unit cell
    shift: CellShift,
}

/// The cell list is used to sort atoms inside bins/cells.
///
/// Cells are defined over a binning frame: along periodic directions the
/// frame uses the cell vectors, and along non-periodic directions it uses
/// orthonormal directions spanning the bounding box of the atoms.
///
/// The list of potential pairs is then constructed by looking through all
/// neighboring cells (the number of cells to search depends on the cutoff and
/// the size of the cells) for each atom to create pair candidates.
#[derive(Debug, Clone)]
struct CellList {
    /// How many cells do we need to look at when searching neighbors to include
    /// all neighbors below cutoff
    n_search: [i32; 3],
    /// the cells themselves
    cells: Array3<Vec<AtomData>>,
    /// Unit cell defining periodic boundary conditions
    unit_cell: UnitCell,
    /// Smallest coordinate along the non-periodic directions
    origin: [f64; 3],
    /// Size of the frame along the non-periodic directions
    extent: [f64; 3],
}

impl CellList {
    /// Create a new `CellList` for the given unit cell, atoms and cutoff,
    /// determining all required parameters.
    fn new(unit_cell: UnitCell, positions: &[Vector3D], cutoff: f64) -> CellList {
        let periodic = unit_cell.periodic();
        let distances_between_faces = unit_cell.distances_between_faces();

        let mut origin = [0.0; 3];
        let mut extent = [1.0; 3];
        let mut lengths = [0.0; 3];
        for xyz in 0..3 {
            if periodic[xyz] {
                lengths[xyz] = distances_between_faces[xyz];
            } else {
                let mut min = f64::INFINITY;
                let mut max = f64::NEG_INFINITY;
                for &position in positions {
                    let projection = unit_cell.fractional(position)[xyz];
                    min = f64::min(min, projection);
                    max = f64::max(max, projection);
                }

                if positions.is_empty() {
                    min = 0.0;
                    max = 0.0;
                }

                origin[xyz] = min;
                extent[xyz] = f64::max(max - min, cutoff);
                lengths[xyz] = extent[xyz];
            }
        }

        let mut n_cells = [
            f64::clamp(f64::trunc(lengths[0] / cutoff), 1.0, f64::INFINITY),
            f64::clamp(f64::trunc(lengths[1] / cutoff), 1.0, f64::INFINITY),
            f64::clamp(f64::trunc(lengths[2] / cutoff), 1.0, f64::INFINITY),
        ];

        // limit memory consumption by ensuring we have less than `MAX_N_CELLS`
        // cells to look though
        let n_cells_total = n_cells[0] * n_cells[1] * n_cells[2];
        if n_cells_total > MAX_NUMBER_OF_CELLS {
            // set the total number of cells close to MAX_N_CELLS, while keeping
            // roughly the ratio of cells in each direction
            let ratio_x_y = n_cells[0] / n_cells[1];
            let ratio_y_z = n_cells[1] / n_cells[2];

            n_cells[2] = f64::max(1.0, f64::trunc(f64::cbrt(MAX_NUMBER_OF_CELLS / (ratio_x_y * ratio_y_z * ratio_y_z))));
            n_cells[1] = f64::max(1.0, f64::trunc(ratio_y_z * n_cells[2]));
            n_cells[0] = f64::max(1.0, f64::trunc(ratio_x_y * n_cells[1]));

            // the ratios can bring back large values when some directions
            // only have a single cell
            for xyz in 0..3 {
                let others = n_cells[(xyz + 1) % 3] * n_cells[(xyz + 2) % 3];
                let max = f64::max(1.0, f64::trunc(MAX_NUMBER_OF_CELLS / others));
                n_cells[xyz] = f64::min(n_cells[xyz], max);
            }
        }

        // number of cells to search in each direction to make sure all possible
        // pairs below the cutoff are accounted for.
        let mut n_search = [
            f64::ceil(cutoff * n_cells[0] / lengths[0]) as i32,
            f64::ceil(cutoff * n_cells[1] / lengths[1]) as i32,
            f64::ceil(cutoff * n_cells[2] / lengths[2]) as i32,
        ];

        let n_cells = [
            n_cells[0] as usize,
            n_cells[1] as usize,
            n_cells[2] as usize,
        ];

        for xyz in 0..3 {
            if n_search[xyz] < 1 {
                n_search[xyz] = 1;
            }

            // don't look for neighboring cells if we have only one cell and no
            // periodic boundary condition
            if n_cells[xyz] == 1 && !periodic[xyz] {
                n_search[xyz] = 0;
            }
        }

        let mut cell_list = CellList {
            n_search: n_search,
            cells: Array3::from_elem(n_cells, Default::default()),
            unit_cell: unit_cell,
            origin: origin,
            extent: extent,
        };

        for (index, &position) in positions.iter().enumerate() {
            cell_list.add_atom(index, position);
        }

        return cell_list;
    }

    /// Add a single atom to the cell list at the given `position`. The atom is
    /// uniquely identified by its `index`.
    fn add_atom(&mut self, index: usize, position: Vector3D) {
        let periodic = self.unit_cell.periodic();
        let mut fractional = self.unit_cell.fractional(position);
        for xyz in 0..3 {
            if !periodic[xyz] {
                fractional[xyz] = (fractional[xyz] - self.origin[xyz]) / self.extent[xyz];
            }
        }

        let n_cells = self.cells.shape();
        let n_cells = [n_cells[0], n_cells[1], n_cells[2]];

        // find the subcell in which this atom 'should go'
        let cell_index = [
            f64::floor(fractional[0] * n_cells[0] as f64) as i32,
            f64::floor(fractional[1] * n_cells[1] as f64) as i32,
            f64::floor(fractional[2] * n_cells[2] as f64) as i32,
        ];

        // deal with pbc by wrapping the atom inside if it was outside of the
        // cell, and clamp the index along non-periodic directions
        let (mut shift, mut wrapped_index) = divmod_vec(cell_index, n_cells);
        for xyz in 0..3 {
            if !periodic[xyz] {
                shift[xyz] = 0;
                wrapped_index[xyz] = i32::clamp(cell_index[xyz], 0, n_cells[xyz] as i32 - 1) as usize;
            }
        }

        self.cells[wrapped_index].push(AtomData {
            index: index,
            shift: CellShift(shift),
        });
    }

    /// Get the list of candidate pair. Some pairs might be separated by more
    /// than `cutoff`, so additional filtering of the pairs is required
    /// later.
    fn candidates(&self) -> Vec<CellPair> {
        let mut pairs = Vec::new();

        let periodic = self.unit_cell.periodic();
        let n_cells = self.cells.shape();
        let n_cells = [n_cells[0], n_cells[1], n_cells[2]];

        let search_x = -self.n_search[0]..=self.n_search[0];
        let search_y = -self.n_search[1]..=self.n_search[1];
        let search_z = -self.n_search[2]..=self.n_search[2];

        // for each cell in the cell list
        for ((cell_i_x, cell_i_y, cell_i_z), current_cell) in self.cells.indexed_iter() {
            // look through each neighboring cell
            for delta_x in search_x.clone() {
                for delta_y in search_y.clone() {
                    for delta_z in search_z.clone() {
                        let cell_i = [
                            cell_i_x as i32 + delta_x,
                            cell_i_y as i32 + delta_y,
                            cell_i_z as i32 + delta_z,
                        ];

                        // shift vector from one cell to the other and index of
                        // the neighboring cell
                        let (cell_shift, neighbor_cell_i) = divmod_vec(cell_i, n_cells);

                        // there is no neighboring cell outside of the frame
                        // along non-periodic directions
                        if (0..3).any(|xyz| !periodic[xyz] && cell_shift[xyz] != 0) {
                            continue;
                        }

                        for atom_i in current_cell {
                            for atom_j in &self.cells[neighbor_cell_i] {
                                // create a half neighbor list
                                if atom_i.index > atom_j.index {
                                    continue;
                                }

                                let shift = CellShift(cell_shift) + atom_i.shift - atom_j.shift;

                                if atom_i.index == atom_j.index {
                                    if shift.is_zero() {
                                        // only create pairs with the same atom
                                        // twice if the pair spans more than
                                        // one unit cell
                                        continue;
                                    }

                                    if !shift.is_in_positive_half_space() {
                                        continue;
                                    }
                                }

                                pairs.push(CellPair {
                                    first: atom_i.index,
                                    second: atom_j.index,
                                    shift: shift,
                                });
                            }
                        } // loop over atoms in current neighbor cells

                    }
                }
            } // loop over neighboring cells

        }

        return pairs;
    }
}

/// Pair search binning atoms in cells of size larger than the cutoff, and
/// only looking for neighbors in adjacent cells. This scales linearly with
/// the number of atoms.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellListSearch;

impl PairSearch for CellListSearch {
    fn pairs(&self, positions: &[Vector3D], cell: &UnitCell, cutoff: f64) -> Result<Vec<CellPair>, Error> {
        check_cutoff(cutoff)?;

        let cell_list = CellList::new(*cell, positions, cutoff);
        let cutoff2 = cutoff * cutoff;

        // the cell list creates too many pairs, we only need to keep the one where
        // the distance is actually below the cutoff
        let mut pairs = Vec::new();
        for pair in cell_list.candidates() {
            let vector = positions[pair.second] - positions[pair.first] + pair.shift.cartesian(cell);
            if check_distance(pair.first, pair.second, vector, cutoff2) {
                pairs.push(pair);
            }
        }

        return Ok(pairs);
    }
}

/// Pair search checking every pair of atoms against every periodic image
/// within the cutoff. This scales quadratically with the number of atoms,
/// and is mainly useful as a reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForceSearch;

impl PairSearch for BruteForceSearch {
    fn pairs(&self, positions: &[Vector3D], cell: &UnitCell, cutoff: f64) -> Result<Vec<CellPair>, Error> {
        check_cutoff(cutoff)?;

        let periodic = cell.periodic();
        let distances_between_faces = cell.distances_between_faces();

        // wrap all atoms inside the cell, remembering the corresponding shift
        let mut wrapped = Vec::with_capacity(positions.len());
        let mut wrapping_shifts = Vec::with_capacity(positions.len());
        for &position in positions {
            let fractional = cell.fractional(position);
            let mut shift = [0; 3];
            for xyz in 0..3 {
                if periodic[xyz] {
                    shift[xyz] = f64::floor(fractional[xyz]) as i32;
                }
            }
            let shift = CellShift(shift);
            wrapped.push(position - shift.cartesian(cell));
            wrapping_shifts.push(shift);
        }

        let mut n_images = [0; 3];
        for xyz in 0..3 {
            if periodic[xyz] {
                n_images[xyz] = f64::ceil(cutoff / distances_between_faces[xyz]) as i32 + 1;
            }
        }

        let cutoff2 = cutoff * cutoff;
        let mut pairs = Vec::new();
        for first in 0..positions.len() {
            for second in first..positions.len() {
                for image_x in -n_images[0]..=n_images[0] {
                    for image_y in -n_images[1]..=n_images[1] {
                        for image_z in -n_images[2]..=n_images[2] {
                            let image = CellShift([image_x, image_y, image_z]);
                            if first == second && (image.is_zero() || !image.is_in_positive_half_space()) {
                                continue;
                            }

                            let approximate = wrapped[second] - wrapped[first] + image.cartesian(cell);
                            if approximate.norm2() > 4.0 * cutoff2 {
                                continue;
                            }

                            // use the same expression as the other searches
                            // for the final distance check
                            let shift = image + wrapping_shifts[first] - wrapping_shifts[second];
                            let vector = positions[second] - positions[first] + shift.cartesian(cell);
                            if check_distance(first, second, vector, cutoff2) {
                                pairs.push(CellPair {
                                    first: first,
                                    second: second,
                                    shift: shift,
                                });
                            }
                        }
                    }
                }
            }
        }

        return Ok(pairs);
    }
}

/// Available implementations of the spatial pairing primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub enum NeighborSearch {
    /// Use a cell list, see [`CellListSearch`]
    #[default]
    CellList,
    /// Check all pairs, see [`BruteForceSearch`]
    BruteForce,
}

impl PairSearch for NeighborSearch {
    fn pairs(&self, positions: &[Vector3D], cell: &UnitCell, cutoff: f64) -> Result<Vec<CellPair>, Error> {
        match self {
            NeighborSearch::CellList => CellListSearch.pairs(positions, cell, cutoff),
            NeighborSearch::BruteForce => BruteForceSearch.pairs(positions, cell, cutoff),
        }
    }
}

/// Function to compute both quotient and remainder of the division of a by b.
/// This function follows Python convention, making sure the remainder have the
/// same sign as `b`.
fn divmod(a: i32, b: usize) -> (i32, usize) {
    debug_assert!(b < (i32::MAX as usize));
    let b = b as i32;
    let mut quotient = a / b;
    let mut remainder = a % b;
    if remainder < 0 {
        remainder += b;
        quotient -= 1;
    }
    return (quotient, remainder as usize);
}

/// Apply the [`divmod`] function to three components at the time
fn divmod_vec(a: [i32; 3], b: [usize; 3]) -> ([i32; 3], [usize; 3]) {
    let (qx, rx) = divmod(a[0], b[0]);
    let (qy, ry) = divmod(a[1], b[1]);
    let (qz, rz) = divmod(a[2], b[2]);
    return ([qx, qy, qz], [rx, ry, rz]);
}

/// Options controlling the neighbor list
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct NeighborOptions {
    /// Extra distance added to the cutoff of every atom when building the
    /// list. The list is only re-built when an atom moved by more than this
    /// distance since the last build.
    pub skin: f64,
    /// Which pair search implementation to use
    #[serde(default)]
    pub search: NeighborSearch,
}

impl Default for NeighborOptions {
    fn default() -> NeighborOptions {
        NeighborOptions {
            skin: 0.3,
            search: NeighborSearch::CellList,
        }
    }
}

impl NeighborOptions {
    /// Check that these options are valid
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.skin.is_finite() && self.skin >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "expected a positive and finite skin for the neighbor list, got {}", self.skin
            )));
        }
        return Ok(());
    }
}

/// Data saved at the time of the last build, used to decide when to re-build
#[derive(Debug, Clone)]
struct Snapshot {
    cell: UnitCell,
    positions: Vec<Vector3D>,
    cutoffs: Vec<f64>,
}

/// Full neighbor list with a skin, re-built only when atoms moved enough to
/// (potentially) change the set of neighbors within the actual cutoff.
///
/// Each atom `i` gets a cutoff radius `cutoffs[i]`, and a pair `i-j` is
/// included when the distance between the atoms is below
/// `cutoffs[i] + cutoffs[j] + 2 * skin`. Pairs are stored in both directions
/// (`i-j` with shift `S` and `j-i` with shift `-S`), sorted by first atom,
/// second atom and cell shift.
#[derive(Debug, Clone)]
pub struct NeighborList {
    options: NeighborOptions,
    /// Second atom in each pair
    neighbors: Vec<usize>,
    /// Cell shift for each pair
    shifts: Vec<[i32; 3]>,
    /// Pairs with `first == i` are stored at
    /// `first_neighbor[i]..first_neighbor[i + 1]`
    first_neighbor: Vec<usize>,
    /// `None` until the first build
    snapshot: Option<Snapshot>,
    builds: usize,
}

impl NeighborList {
    /// Create a new empty neighbor list with the given options
    pub fn new(options: NeighborOptions) -> Result<NeighborList, Error> {
        options.validate()?;
        return Ok(NeighborList {
            options: options,
            neighbors: Vec::new(),
            shifts: Vec::new(),
            first_neighbor: Vec::new(),
            snapshot: None,
            builds: 0,
        });
    }

    /// Get the skin distance of this neighbor list
    pub fn skin(&self) -> f64 {
        self.options.skin
    }

    /// Get how many times this neighbor list has been built
    pub fn builds(&self) -> usize {
        self.builds
    }

    /// Get the total number of (directed) pairs in this neighbor list
    pub fn pairs_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if the list was built at least once
    pub fn is_built(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Update this neighbor list for the given `system`, with one cutoff
    /// radius per atom. The list is (re-)built if it was never built before,
    /// if the number of atoms, the unit cell (including the periodicity) or
    /// the cutoffs changed, or if any atom moved by more than the skin
    /// distance since the last build.
    ///
    /// Returns `true` if the list was re-built, `false` otherwise.
    pub fn update(&mut self, system: &dyn System, cutoffs: &[f64]) -> Result<bool, Error> {
        let positions = system.positions()?;
        let cell = system.cell()?;

        if self.needs_rebuild(positions, &cell, cutoffs) {
            self.build(system, cutoffs)?;
            return Ok(true);
        }

        return Ok(false);
    }

    #[allow(clippy::float_cmp)]
    fn needs_rebuild(&self, positions: &[Vector3D], cell: &UnitCell, cutoffs: &[f64]) -> bool {
        let snapshot = match self.snapshot {
            Some(ref snapshot) => snapshot,
            None => return true,
        };

        if snapshot.positions.len() != positions.len() {
            return true;
        }

        if snapshot.cell.periodic() != cell.periodic() || snapshot.cell.matrix() != cell.matrix() {
            return true;
        }

        if snapshot.cutoffs != cutoffs {
            return true;
        }

        let skin2 = self.options.skin * self.options.skin;
        let max_displacement2 = snapshot.positions.iter()
            .zip(positions)
            .map(|(&old, &new)| (new - old).norm2())
            .fold(0.0, f64::max);

        return max_displacement2 > skin2;
    }

    /// Build the list from scratch for the given `system`, with one cutoff
    /// radius per atom.
    #[time_graph::instrument(name = "NeighborList::build")]
    pub fn build(&mut self, system: &dyn System, cutoffs: &[f64]) -> Result<(), Error> {
        let positions = system.positions()?;
        let cell = system.cell()?;

        if cutoffs.len() != positions.len() {
            return Err(Error::InvalidParameter(format!(
                "expected one cutoff per atom in the neighbor list, got {} cutoffs for {} atoms",
                cutoffs.len(), positions.len()
            )));
        }

        for &cutoff in cutoffs {
            if !(cutoff.is_finite() && cutoff >= 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "expected positive and finite cutoffs for the neighbor list, got {}", cutoff
                )));
            }
        }

        let skin = self.options.skin;
        let max_cutoff = cutoffs.iter().copied().fold(0.0, f64::max);
        let search_cutoff = 2.0 * (max_cutoff + skin);

        let half_pairs = if search_cutoff > 0.0 && !positions.is_empty() {
            self.options.search.pairs(positions, &cell, search_cutoff)?
        } else {
            Vec::new()
        };

        let mut pairs = Vec::with_capacity(2 * half_pairs.len());
        for pair in half_pairs {
            let vector = positions[pair.second] - positions[pair.first] + pair.shift.cartesian(&cell);
            let pair_cutoff = cutoffs[pair.first] + cutoffs[pair.second] + 2.0 * skin;
            if vector.norm2() > pair_cutoff * pair_cutoff {
                continue;
            }

            pairs.push((pair.first, pair.second, pair.shift));
            pairs.push((pair.second, pair.first, -pair.shift));
        }
        pairs.sort_unstable();

        self.first_neighbor.clear();
        self.first_neighbor.resize(positions.len() + 1, 0);
        for &(first, _, _) in &pairs {
            self.first_neighbor[first + 1] += 1;
        }
        for i in 0..positions.len() {
            self.first_neighbor[i + 1] += self.first_neighbor[i];
        }

        self.neighbors = pairs.iter().map(|&(_, second, _)| second).collect();
        self.shifts = pairs.iter().map(|&(_, _, shift)| shift.0).collect();

        self.snapshot = Some(Snapshot {
            cell: cell,
            positions: positions.to_vec(),
            cutoffs: cutoffs.to_vec(),
        });
        self.builds += 1;

        debug!(
            "built neighbor list for {} atoms with {} pairs (build #{})",
            positions.len(), self.neighbors.len(), self.builds
        );

        return Ok(());
    }

    /// Get the neighbors of the given `atom` and the corresponding cell
    /// shifts, such that the vector from `atom` to its neighbor `j` is
    /// `positions[j] - positions[atom] + shift * cell`.
    ///
    /// # Panics
    ///
    /// If the list was never built, or if `atom` is out of bounds.
    pub fn neighbors_of(&self, atom: usize) -> (&[usize], &[[i32; 3]]) {
        assert!(
            atom + 1 < self.first_neighbor.len(),
            "atom index {} is out of bounds for this neighbor list", atom
        );
        let start = self.first_neighbor[atom];
        let stop = self.first_neighbor[atom + 1];
        return (&self.neighbors[start..stop], &self.shifts[start..stop]);
    }
}
