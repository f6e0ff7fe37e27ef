#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]
#![allow(clippy::default_trait_access)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

//! Rotation and permutation invariant descriptors of atomic environments,
//! built on a radial basis of Chebyshev polynomials and complex spherical
//! harmonics.
//!
//! ```
//! use spherical_chebyshev::{SphericalChebyshev, SphericalChebyshevParameters};
//! use spherical_chebyshev::{SimpleSystem, UnitCell, Vector3D};
//!
//! let mut system = SimpleSystem::new(UnitCell::infinite());
//! system.add_atom("O", Vector3D::new(0.0, 0.0, 0.119262));
//! system.add_atom("H", Vector3D::new(0.0, 0.763239, -0.477047));
//! system.add_atom("H", Vector3D::new(0.0, -0.763239, -0.477047));
//!
//! let parameters = SphericalChebyshevParameters::from_json(
//!     r#"{"atom_types": ["H", "O"], "nmax": 2, "lmax": 2, "rcut": 4.0}"#
//! ).unwrap();
//! let mut calculator = SphericalChebyshev::new(parameters).unwrap();
//!
//! let descriptor = calculator.evaluate(&system).unwrap();
//! assert_eq!(descriptor.values.shape(), [3, 18]);
//! ```

pub mod types;
pub use types::*;

pub mod math;

mod errors;
pub use self::errors::Error;

pub mod systems;
pub use systems::{System, SimpleSystem, UnitCell};

pub mod descriptor;
pub use descriptor::Descriptor;

pub mod calculators;
pub use calculators::{SphericalChebyshev, SphericalChebyshevParameters, CalculationOptions};
