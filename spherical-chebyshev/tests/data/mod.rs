#![allow(dead_code)]

use ndarray::Array2;
use serde_json::Value;

use spherical_chebyshev::{SimpleSystem, Matrix3, Vector3D, UnitCell};

type HyperParameters = String;

fn load_json(path: &str) -> Value {
    let json = std::fs::read_to_string(format!("tests/data/{}", path))
        .expect("failed to read input file");

    return serde_json::from_str(&json).expect("failed to parse JSON");
}

/// Load the system and the calculator hyper-parameters (as a JSON string)
/// from the given file
pub fn load_calculator_input(path: &str) -> (SimpleSystem, HyperParameters) {
    let data = load_json(path);
    let parameters = data["hyperparameters"].to_string();

    let system = &data["system"];
    let cell = read_cell(&system["cell"], &system["periodic"]);
    let mut simple_system = SimpleSystem::new(cell);

    let species = system["species"].as_array().expect("species must be an array");
    let positions = system["positions"].as_array().expect("positions must be an array");

    for (species, position) in species.iter().zip(positions) {
        let species = species.as_str().expect("species must be a string");
        let position = position.as_array().expect("position must be an array");
        let position = Vector3D::new(
            position[0].as_f64().unwrap(),
            position[1].as_f64().unwrap(),
            position[2].as_f64().unwrap(),
        );

        simple_system.add_atom(species, position);
    }

    (simple_system, parameters)
}

fn read_cell(cell: &Value, periodic: &Value) -> UnitCell {
    let cell = cell.as_array().expect("cell must be an array");
    let matrix = Matrix3::new([
        [cell[0].as_f64().unwrap(), cell[1].as_f64().unwrap(), cell[2].as_f64().unwrap()],
        [cell[3].as_f64().unwrap(), cell[4].as_f64().unwrap(), cell[5].as_f64().unwrap()],
        [cell[6].as_f64().unwrap(), cell[7].as_f64().unwrap(), cell[8].as_f64().unwrap()],
    ]);

    let periodic = periodic.as_array().expect("periodic must be an array");
    let periodic = [
        periodic[0].as_bool().unwrap(),
        periodic[1].as_bool().unwrap(),
        periodic[2].as_bool().unwrap(),
    ];

    UnitCell::new(matrix, periodic).expect("invalid unit cell")
}

/// Load the expected descriptor values from the given file
pub fn load_expected_values(path: &str) -> Array2<f64> {
    let data = load_json(path);
    let rows = data["values"].as_array().expect("values must be an array");

    let n_features = rows.first().and_then(|row| row.as_array()).map_or(0, |row| row.len());
    let mut values = Array2::zeros((rows.len(), n_features));
    for (i, row) in rows.iter().enumerate() {
        let row = row.as_array().expect("each row must be an array");
        assert_eq!(row.len(), n_features, "all rows must have the same size");
        for (j, value) in row.iter().enumerate() {
            values[[i, j]] = value.as_f64().expect("values must be numbers");
        }
    }

    return values;
}
