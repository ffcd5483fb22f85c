//! Geometry and property access shared by the triangle and quad helpers

use super::IsoDomain;
use crate::elements::{Element, MaterialProperties, Topology};
use crate::error::{FEAError, FEAResult};
use crate::math::{invert_jacobian, IsoPoint, Mat, Vec3};

pub(super) fn check_planar(elm: &Element, topology: Topology, helper: &str) -> FEAResult<()> {
    if elm.topology() != topology {
        return Err(FEAError::unsupported(format!(
            "{helper} needs a {topology:?} element, got {:?}",
            elm.topology()
        )));
    }
    elm.planar_section()?;
    elm.material()?;
    let nodes = elm.local_node_coordinates()?;
    let size = nodes.iter().fold(0.0_f64, |acc, p| acc.max(p.norm()));
    let out_of_plane = nodes.iter().fold(0.0_f64, |acc, p| acc.max(p.z.abs()));
    if out_of_plane > 1e-6 * size + elm.options().geometry_tolerance {
        return Err(FEAError::degenerate(format!(
            "nodes are not coplanar, offset {out_of_plane:e}"
        )));
    }
    Ok(())
}

/// Thickness and material at `iso`
pub(super) fn properties_at(elm: &Element, _iso: IsoPoint) -> FEAResult<(f64, MaterialProperties)> {
    let t = elm.planar_section()?.thickness;
    Ok((t, elm.material()?.properties_at(0.0)?))
}

/// Jacobian in the local plane
pub(super) fn jacobian(elm: &Element, domain: IsoDomain, iso: IsoPoint) -> FEAResult<Mat> {
    let nodes: Vec<Vec3> = elm.local_node_coordinates()?;
    domain.jacobian(&nodes, iso)
}

/// Shape function derivatives with respect to local x and y, one row per axis
pub(super) fn cartesian_derivatives(elm: &Element, domain: IsoDomain, iso: IsoPoint) -> FEAResult<Mat> {
    let j = jacobian(elm, domain, iso)?;
    let (inv, _) = invert_jacobian(&j, elm.options().geometry_tolerance)?;
    Ok(inv * domain.shape_derivatives(iso))
}

/// `[N1, 0, N2, 0, ..; 0, N1, 0, N2, ..]`
pub(super) fn in_plane_interpolation(domain: IsoDomain, iso: IsoPoint) -> Mat {
    let n = domain.shape_values(iso);
    let mut m = Mat::zeros(2, 2 * n.len());
    for (i, v) in n.iter().enumerate() {
        m[(0, 2 * i)] = *v;
        m[(1, 2 * i + 1)] = *v;
    }
    m
}

/// Membrane strain rows `[du/dx, dv/dy, du/dy + dv/dx]`
pub(super) fn membrane_b(elm: &Element, domain: IsoDomain, iso: IsoPoint) -> FEAResult<Mat> {
    let dn = cartesian_derivatives(elm, domain, iso)?;
    let count = dn.ncols();
    let mut b = Mat::zeros(3, 2 * count);
    for i in 0..count {
        let (dx, dy) = (dn[(0, i)], dn[(1, i)]);
        b[(0, 2 * i)] = dx;
        b[(1, 2 * i + 1)] = dy;
        b[(2, 2 * i)] = dy;
        b[(2, 2 * i + 1)] = dx;
    }
    Ok(b)
}

/// Single row `[N1, 0, 0, N2, 0, 0, ..]` interpolating the plate deflection
pub(super) fn deflection_interpolation(domain: IsoDomain, iso: IsoPoint) -> Mat {
    let n = domain.shape_values(iso);
    let mut m = Mat::zeros(1, 3 * n.len());
    for (i, v) in n.iter().enumerate() {
        m[(0, 3 * i)] = *v;
    }
    m
}
