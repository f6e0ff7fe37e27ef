use indexmap::IndexSet;

use crate::{Error, System};

/// Ordered set of atomic types, associating each type label with a 0-based
/// type id and an integer spin.
///
/// Spins are obtained by splitting the list of types symmetrically around
/// zero, starting at `-(count / 2)` and skipping zero when the number of types
/// is even: two types get spins `{-1, 1}`, three types `{-1, 0, 1}` and four
/// types `{-2, -1, 1, 2}`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesTable {
    labels: IndexSet<String>,
    spins: Vec<i32>,
}

impl SpeciesTable {
    /// Create a new table from an ordered list of unique, non-empty labels
    pub fn new(labels: &[String]) -> Result<SpeciesTable, Error> {
        let mut set = IndexSet::new();
        for label in labels {
            if label.is_empty() {
                return Err(Error::InvalidParameter(
                    "atomic types labels can not be empty strings".into()
                ));
            }

            if !set.insert(label.clone()) {
                return Err(Error::InvalidParameter(format!(
                    "atomic type '{}' is present multiple times in the list of types", label
                )));
            }
        }

        if set.is_empty() {
            return Err(Error::InvalidParameter(
                "the list of atomic types can not be empty".into()
            ));
        }

        let spins = compute_spins(set.len());
        return Ok(SpeciesTable {
            labels: set,
            spins: spins,
        });
    }

    /// Get the number of types in this table
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Is this table empty? This is always false for a constructed table.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Get the type id associated with the given `label`, if any
    pub fn type_id(&self, label: &str) -> Option<usize> {
        self.labels.get_index_of(label)
    }

    /// Get the label of the type with the given id
    pub fn label(&self, type_id: usize) -> Option<&str> {
        self.labels.get_index(type_id).map(|label| label.as_str())
    }

    /// Get the spin of all types, indexed by type id
    pub fn spins(&self) -> &[i32] {
        &self.spins
    }

    /// Is there a spin channel for this set of types?
    pub fn has_spin_channel(&self) -> bool {
        self.labels.len() > 1
    }

    /// Get the type id of all atoms in the `system`, or an error if some of
    /// the atoms have an unknown type.
    pub fn types(&self, system: &dyn System) -> Result<Vec<usize>, Error> {
        let species = system.species()?;
        let mut types = Vec::with_capacity(species.len());
        for (atom, label) in species.iter().enumerate() {
            match self.type_id(label) {
                Some(id) => types.push(id),
                None => {
                    return Err(Error::InvalidParameter(format!(
                        "atom {} has type '{}', which is not part of the known types ({})",
                        atom, label, self.labels.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                    )));
                }
            }
        }
        return Ok(types);
    }
}

fn compute_spins(count: usize) -> Vec<i32> {
    let start = -((count / 2) as i32);
    let mut spins = Vec::with_capacity(count);
    for i in 0..count {
        let mut spin = start + i as i32;
        if count % 2 == 0 && spin >= 0 {
            spin += 1;
        }
        spins.push(spin);
    }
    return spins;
}
