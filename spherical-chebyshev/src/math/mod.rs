//! Numerical building blocks: factorials, cutoff function, Chebyshev radial
//! basis and complex spherical harmonics in Cartesian coordinates.

mod gamma;
pub use self::gamma::gamma;

mod factorial;
pub use self::factorial::factorial;

mod cutoff;
pub use self::cutoff::polynomial_cutoff;

mod chebyshev;
pub use self::chebyshev::{chebyshev, chebyshev_d1, chebyshev_into, chebyshev_d1_into};

mod spherical_harmonics;
pub use self::spherical_harmonics::{SphericalHarmonics, SphericalHarmonicsArray};
pub use self::spherical_harmonics::{solid_harmonic, spherical_harmonic, spherical_harmonic_gradient};
pub use self::spherical_harmonics::{solid_harmonics_all, spherical_harmonics_all, spherical_harmonics_gradient_all};
pub(crate) use self::spherical_harmonics::SphericalHarmonicsCache;
