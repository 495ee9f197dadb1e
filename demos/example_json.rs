#![allow(non_snake_case)]

use engine_bridge::engine::ReferenceEngine;
use engine_bridge::session::*;
use std::fs::File;

fn main() {
    let system = LinearSystem::from_triplets(
        3,
        &[0, 1, 2, 0],
        &[0, 1, 2, 2],
        &[4., 5., 6., 1.],
        vec![1., 2., 3.],
    )
    .unwrap();

    // write the system to a file
    let filename = "engine_bridge_linear_system.json";
    let mut file = File::create(filename).unwrap();
    system.write_to_file(&mut file).unwrap();

    // read it back and solve it
    let mut file = File::open(filename).unwrap();
    let system = LinearSystem::read_from_file(&mut file).unwrap();

    let mut session = Session::new(ReferenceEngine::new(), SessionSettings::default()).unwrap();
    let x = session.solve_linear_system(&system).unwrap();
    println!("x = {:?}", x);

    std::fs::remove_file(filename).unwrap();
}
