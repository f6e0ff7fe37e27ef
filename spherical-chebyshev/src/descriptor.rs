//! Output of the descriptor calculation: one row of features per atom,
//! optional gradients with respect to atomic positions and diagnostics.
use ndarray::{Array2, Array3, ArrayView1, ArrayView2};

/// Kind of non-fatal issues found while computing a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// This atom has no neighbor inside the cutoff radius, the corresponding
    /// row of the descriptor is filled with zeros
    IsolatedAtom,
}

/// A non-fatal issue found while computing the descriptor of a given atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// what happened
    pub code: DiagnosticCode,
    /// index of the atom in the system
    pub atom: usize,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            DiagnosticCode::IsolatedAtom => write!(
                f, "atom {} has no neighbor inside the cutoff radius", self.atom
            ),
        }
    }
}

/// Gradients of the descriptor with respect to atomic positions
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorGradients {
    /// Pairs of `(center, atom)` indexes, sorted in lexicographic order. The
    /// sample `[i, j]` contains the gradient of the row for atom `i` with
    /// respect to the position of atom `j`.
    pub samples: Vec<[usize; 2]>,
    /// Array of shape `(samples, 3, features)` containing the gradients for
    /// each sample and Cartesian direction
    pub values: Array3<f64>,
}

impl DescriptorGradients {
    /// Get the index of the sample for the gradient of the row of `center`
    /// with respect to the position of `atom`, if this gradient is not zero.
    pub fn position(&self, center: usize, atom: usize) -> Option<usize> {
        self.samples.binary_search(&[center, atom]).ok()
    }

    /// Get the gradient of the row for `center` with respect to the
    /// position of `atom`, as an array of shape `(3, features)`
    pub fn get(&self, center: usize, atom: usize) -> Option<ArrayView2<'_, f64>> {
        let sample = self.position(center, atom)?;
        return Some(self.values.index_axis(ndarray::Axis(0), sample));
    }
}

/// Atom-centered descriptor of an atomic system
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    /// Array of shape `(atoms, features)`, containing one row of invariant
    /// features for each atom in the system
    pub values: Array2<f64>,
    /// Gradients of the values, if they were requested
    pub gradients: Option<DescriptorGradients>,
    /// Diagnostics collected during the calculation, sorted by atom
    pub diagnostics: Vec<Diagnostic>,
}

impl Descriptor {
    /// Get the descriptor for a single atom
    pub fn row(&self, atom: usize) -> ArrayView1<'_, f64> {
        self.values.row(atom)
    }

    /// Get the list of atoms without any neighbor inside the cutoff
    pub fn isolated_atoms(&self) -> Vec<usize> {
        self.diagnostics.iter()
            .filter(|diagnostic| diagnostic.code == DiagnosticCode::IsolatedAtom)
            .map(|diagnostic| diagnostic.atom)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array;

    use super::*;

    #[test]
    fn gradients_lookup() {
        let gradients = DescriptorGradients {
            samples: vec![[0, 0], [0, 2], [1, 1], [2, 0]],
            values: Array::from_shape_fn((4, 3, 2), |(s, d, f)| (100 * s + 10 * d + f) as f64),
        };

        assert_eq!(gradients.position(0, 2), Some(1));
        assert_eq!(gradients.position(2, 0), Some(3));
        assert_eq!(gradients.position(1, 0), None);

        let gradient = gradients.get(1, 1).unwrap();
        assert_eq!(gradient.shape(), [3, 2]);
        assert_eq!(gradient[[2, 1]], 221.0);
        assert!(gradients.get(2, 2).is_none());
    }

    #[test]
    fn diagnostics() {
        let descriptor = Descriptor {
            values: Array2::zeros((3, 4)),
            gradients: None,
            diagnostics: vec![
                Diagnostic { code: DiagnosticCode::IsolatedAtom, atom: 1 },
            ],
        };

        assert_eq!(descriptor.isolated_atoms(), [1]);
        assert_eq!(descriptor.row(2).len(), 4);
        assert_eq!(
            descriptor.diagnostics[0].to_string(),
            "atom 1 has no neighbor inside the cutoff radius"
        );
    }
}
