//! FEA Elements Example - cantilever, truss bar and shaft
//!
//! Each member is fixed at its first node, so the free node's block of the
//! local stiffness is solved directly against the equivalent nodal loads.
//! Run with `RUST_LOG=debug` to see the formulation steps.

use anyhow::{Context, Result};
use fea_elements::prelude::*;
use log::info;

/// Local displacement of the free end of a member fixed at its first node.
///
/// Only the DOFs the member is stiff in are solved; the others stay zero.
fn free_end_displacement(elm: &Element, load: &ElementalLoad) -> Result<Displacement> {
    let k = elm.local_stiffness_matrix()?;
    let forces = elm.local_equivalent_nodal_loads(load)?;
    let loads = forces[1].to_array();
    let active: Vec<usize> = (6..12).filter(|&i| k[(i, i)] != 0.0).collect();

    let free = Mat::from_fn(active.len(), active.len(), |r, c| k[(active[r], active[c])]);
    let rhs = Vector::from_iterator(active.len(), active.iter().map(|&i| loads[i - 6]));
    let u = free
        .lu()
        .solve(&rhs)
        .context("free end stiffness is singular")?;

    let mut values = [0.0; 6];
    for (&i, v) in active.iter().zip(u.iter()) {
        values[i - 6] = *v;
    }
    Ok(Displacement::from_array(values))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== FEA Elements Example ===\n");

    // Concrete cantilever, 5 m, 300 x 500 mm, 12 kN/m downward
    let length = 5.0;
    let w = 12e3;
    let section = CrossSectionProperties::rectangular(0.3, 0.5);
    let material = MaterialProperties::isotropic(30e9, 0.2, 2500.0);
    let cantilever = Element::bar(1, Node::new(0.0, 0.0, 0.0), Node::new(length, 0.0, 0.0))
        .with_section(section)
        .with_material(material);
    info!("cantilever helpers: {:?}", cantilever.helpers()?.iter().map(|h| h.kind()).collect::<Vec<_>>());

    let tip = free_end_displacement(&cantilever, &UniformLoad::downward(w).into())?;
    let expected = -w * length.powi(4) / (8.0 * material.ex * section.iz);
    println!("Cantilever under uniform load:");
    println!("  tip DY = {:.4} mm (wL^4/8EI = {:.4} mm)", tip.dy * 1e3, expected * 1e3);
    println!("  tip RZ = {:.6} rad\n", tip.rz);

    // Steel truss bar along a diagonal, 100 kN tension at the free node
    let steel = MaterialProperties::steel();
    let area = 2e-3;
    let bar = Element::bar(2, Node::new(0.0, 0.0, 0.0), Node::new(3.0, 4.0, 0.0))
        .with_behavior(Behavior::TRUSS)
        .with_section(CrossSectionProperties::new(area, 1e-6, 1e-6, 1e-6))
        .with_material(steel);
    let pull: ElementalLoad = ConcentratedLoad::new(
        Force::new(100e3, 0.0, 0.0, 0.0, 0.0, 0.0),
        IsoPoint::on_line(1.0),
        CoordinateSystem::Local,
    )
    .into();
    let d = free_end_displacement(&bar, &pull)?;
    let elongation = d.dx;
    println!("Truss bar under axial load:");
    println!(
        "  elongation = {:.4} mm (FL/EA = {:.4} mm)\n",
        elongation * 1e3,
        100e3 * 5.0 / (steel.ex * area) * 1e3
    );

    // Steel pipe shaft, 2 m, 5 kNm torque at the free node
    let pipe = CrossSectionProperties::pipe(0.2, 0.01);
    let shaft = Element::bar(3, Node::new(0.0, 0.0, 0.0), Node::new(2.0, 0.0, 0.0))
        .with_behavior(Behavior::SHAFT)
        .with_section(pipe)
        .with_material(steel);
    let torque: ElementalLoad = ConcentratedLoad::new(
        Force::new(0.0, 0.0, 0.0, 5e3, 0.0, 0.0),
        IsoPoint::on_line(1.0),
        CoordinateSystem::Local,
    )
    .into();
    let twist = free_end_displacement(&shaft, &torque)?;
    println!("Shaft under torque:");
    println!(
        "  twist = {:.6} rad (TL/GJ = {:.6} rad)",
        twist.rx,
        5e3 * 2.0 / (steel.gxy * pipe.j)
    );

    Ok(())
}
