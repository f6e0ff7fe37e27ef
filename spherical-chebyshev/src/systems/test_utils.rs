use crate::{Matrix3, Vector3D};
use super::{UnitCell, SimpleSystem};

pub fn test_system(name: &str) -> SimpleSystem {
    match name {
        "methane" => get_methane(),
        "water" => get_water(),
        "CH" => get_ch(),
        "NaCl" => get_nacl(),
        "ZnSO4" => get_znso4(),
        _ => panic!("unknown test system {}", name)
    }
}

fn get_methane() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(5.0));
    system.add_atom("C", Vector3D::new(5.0000, 5.0000, 5.0000));
    system.add_atom("H", Vector3D::new(5.5288, 5.1610, 5.9359));
    system.add_atom("H", Vector3D::new(5.2051, 5.8240, 4.3214));
    system.add_atom("H", Vector3D::new(5.3345, 4.0686, 4.5504));
    system.add_atom("H", Vector3D::new(3.9315, 4.9463, 5.1921));
    return system;
}

fn get_water() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::infinite());
    system.add_atom("O", Vector3D::new(0.0, 0.0, 0.119262));
    system.add_atom("H", Vector3D::new(0.0, 0.763239, -0.477047));
    system.add_atom("H", Vector3D::new(0.0, -0.763239, -0.477047));
    return system;
}

fn get_ch() -> SimpleSystem {
    let mut system = SimpleSystem::new(UnitCell::cubic(10.0));
    system.add_atom("C", Vector3D::new(0.0, 0.0, 0.0));
    system.add_atom("H", Vector3D::new(0.0, 1.2, 0.0));
    return system;
}

/// NaCl structure
/// Using a primitive unit cell, the distance between the
/// closest Na-Cl pair is exactly 1. The cubic unit cell
/// in these units would have a length of 2.
fn get_nacl() -> SimpleSystem {
    let cell = Matrix3::new([[0.0, 1.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0]]);
    let mut system = SimpleSystem::new(UnitCell::new(cell, [true; 3]).unwrap());
    system.add_atom("Na", Vector3D::new(0.0, 0.0, 0.0));
    system.add_atom("Cl", Vector3D::new(1.0, 0.0, 0.0));
    return system;
}

/// ZnS (O4) in wurtzite structure (triclinic cell)
fn get_znso4() -> SimpleSystem {
    let u = 3. / 8.;
    let c = f64::sqrt(1. / u);
    let cell = Matrix3::new([[0.5, -0.5 * f64::sqrt(3.0), 0.0], [0.5, 0.5 * f64::sqrt(3.0), 0.0], [0.0, 0.0, c]]);
    let mut system = SimpleSystem::new(UnitCell::new(cell, [true; 3]).unwrap());
    system.add_atom("S", Vector3D::new(0.5, 0.5 / f64::sqrt(3.0), 0.0));
    system.add_atom("Zn", Vector3D::new(0.5, 0.5 / f64::sqrt(3.0), u * c));
    system.add_atom("S", Vector3D::new(0.5, -0.5 / f64::sqrt(3.0), 0.5 * c));
    system.add_atom("Zn", Vector3D::new(0.5, -0.5 / f64::sqrt(3.0), (0.5 + u) * c));
    return system;
}
