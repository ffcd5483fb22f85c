//! Element aggregate: topology, properties and the composed helper list

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::{Behavior, BarSection, EndRelease, Material, Node, PlanarSection};
use crate::error::{ElementId, FEAError, FEAResult};
use crate::helpers::{helpers_for, ElementHelper, HelperKind, IsoDomain};
use crate::loads::{handler_for, ElementalLoad};
use crate::math::{max_abs_diagonal, IsoPoint, Mat, Vec3, Vector};
use crate::options::FormulationOptions;
use crate::permutation::{gather, scatter_matrix, zero_dofs, Dof};
use crate::results::{Displacement, Force};
use crate::transform::TransformManager;

/// Node layout of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topology {
    Bar2,
    Triangle3,
    Quad4,
    Tetra4,
}

impl Topology {
    pub fn node_count(self) -> usize {
        match self {
            Topology::Bar2 => 2,
            Topology::Triangle3 => 3,
            Topology::Quad4 | Topology::Tetra4 => 4,
        }
    }

    pub fn domain(self) -> IsoDomain {
        match self {
            Topology::Bar2 => IsoDomain::Line,
            Topology::Triangle3 => IsoDomain::Triangle,
            Topology::Quad4 => IsoDomain::Rectangle,
            Topology::Tetra4 => IsoDomain::Tetrahedron,
        }
    }

    /// Behavior given to new elements of this topology
    pub fn default_behavior(self) -> Behavior {
        match self {
            Topology::Bar2 => Behavior::FRAME,
            Topology::Triangle3 | Topology::Quad4 => Behavior::FLAT_SHELL,
            Topology::Tetra4 => Behavior::SOLID,
        }
    }

    /// Every flag that can be formulated on this topology
    pub fn allowed_behavior(self) -> Behavior {
        match self {
            Topology::Bar2 => Behavior::BAR_FLAGS,
            Topology::Triangle3 | Topology::Quad4 => Behavior::PLANAR_FLAGS,
            Topology::Tetra4 => Behavior::SOLID,
        }
    }
}

/// Lambda together with the node positions it was built from
#[derive(Debug, Clone)]
struct LambdaCache {
    positions: Vec<Vec3>,
    transform: TransformManager,
}

/// A finite element composed of one helper per selected behavior
pub struct Element {
    id: ElementId,
    topology: Topology,
    nodes: Vec<Node>,
    behavior: Behavior,
    section: Option<BarSection>,
    planar_section: Option<PlanarSection>,
    material: Option<Material>,
    start_release: EndRelease,
    end_release: EndRelease,
    web_rotation: f64,
    options: FormulationOptions,
    lambda_cache: Mutex<Option<LambdaCache>>,
}

impl Clone for Element {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            topology: self.topology,
            nodes: self.nodes.clone(),
            behavior: self.behavior,
            section: self.section.clone(),
            planar_section: self.planar_section,
            material: self.material.clone(),
            start_release: self.start_release,
            end_release: self.end_release,
            web_rotation: self.web_rotation,
            options: self.options.clone(),
            lambda_cache: Mutex::new(self.cache().clone()),
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id)
            .field("topology", &self.topology)
            .field("nodes", &self.nodes)
            .field("behavior", &self.behavior)
            .field("start_release", &self.start_release)
            .field("end_release", &self.end_release)
            .field("web_rotation", &self.web_rotation)
            .finish_non_exhaustive()
    }
}

/// Which integrated matrix to compose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatrixKind {
    Stiffness,
    Mass,
    Damping,
}

impl Element {
    fn new(id: u32, topology: Topology, nodes: Vec<Node>) -> Self {
        Self {
            id: ElementId(id),
            topology,
            nodes,
            behavior: topology.default_behavior(),
            section: None,
            planar_section: None,
            material: None,
            start_release: EndRelease::fixed(),
            end_release: EndRelease::fixed(),
            web_rotation: 0.0,
            options: FormulationOptions::default(),
            lambda_cache: Mutex::new(None),
        }
    }

    /// Two node frame element
    pub fn bar(id: u32, start: Node, end: Node) -> Self {
        Self::new(id, Topology::Bar2, vec![start, end])
    }

    /// Three node flat shell
    pub fn triangle(id: u32, nodes: [Node; 3]) -> Self {
        Self::new(id, Topology::Triangle3, nodes.to_vec())
    }

    /// Four node flat shell, nodes in cyclic order
    pub fn quad(id: u32, nodes: [Node; 4]) -> Self {
        Self::new(id, Topology::Quad4, nodes.to_vec())
    }

    /// Four node solid
    pub fn tetrahedron(id: u32, nodes: [Node; 4]) -> Self {
        Self::new(id, Topology::Tetra4, nodes.to_vec())
    }

    pub fn with_behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn with_section(mut self, section: impl Into<BarSection>) -> Self {
        self.section = Some(section.into());
        self
    }

    pub fn with_planar_section(mut self, section: PlanarSection) -> Self {
        self.planar_section = Some(section);
        self
    }

    pub fn with_material(mut self, material: impl Into<Material>) -> Self {
        self.material = Some(material.into());
        self
    }

    pub fn with_start_release(mut self, release: EndRelease) -> Self {
        self.start_release = release;
        self
    }

    pub fn with_end_release(mut self, release: EndRelease) -> Self {
        self.end_release = release;
        self
    }

    /// Rotation of the section about local x, in radians
    pub fn with_web_rotation(mut self, angle: f64) -> Self {
        self.web_rotation = angle;
        *self.cache_mut() = None;
        self
    }

    pub fn with_options(mut self, options: FormulationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn start_release(&self) -> &EndRelease {
        &self.start_release
    }

    pub fn end_release(&self) -> &EndRelease {
        &self.end_release
    }

    pub fn web_rotation(&self) -> f64 {
        self.web_rotation
    }

    pub fn options(&self) -> &FormulationOptions {
        &self.options
    }

    pub fn bar_section(&self) -> FEAResult<&BarSection> {
        self.section
            .as_ref()
            .ok_or_else(|| FEAError::InvalidInput("bar element has no cross section".into()))
    }

    pub fn planar_section(&self) -> FEAResult<&PlanarSection> {
        self.planar_section
            .as_ref()
            .ok_or_else(|| FEAError::InvalidInput("planar element has no thickness".into()))
    }

    pub fn material(&self) -> FEAResult<&Material> {
        self.material
            .as_ref()
            .ok_or_else(|| FEAError::InvalidInput("element has no material".into()))
    }

    /// Move node `index` and drop the cached lambda
    pub fn set_node_location(&mut self, index: usize, location: Vec3) -> FEAResult<()> {
        let count = self.nodes.len();
        let node = self.nodes.get_mut(index).ok_or_else(|| {
            FEAError::InvalidInput(format!("node index {index} out of range for {count} nodes"))
                .in_element(self.id)
        })?;
        node.x = location.x;
        node.y = location.y;
        node.z = location.z;
        *self.cache_mut() = None;
        Ok(())
    }

    fn cache(&self) -> MutexGuard<'_, Option<LambdaCache>> {
        self.lambda_cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn cache_mut(&mut self) -> &mut Option<LambdaCache> {
        self.lambda_cache.get_mut().unwrap_or_else(|e| e.into_inner())
    }

    fn attributed<T>(&self, r: FEAResult<T>) -> FEAResult<T> {
        r.map_err(|e| e.in_element(self.id))
    }

    /// Node count and behavior flags against the topology
    pub fn validate(&self) -> FEAResult<()> {
        self.attributed(self.validate_inner())
    }

    fn validate_inner(&self) -> FEAResult<()> {
        let expected = self.topology.node_count();
        if self.nodes.len() != expected {
            return Err(FEAError::unsupported(format!(
                "{:?} needs {expected} nodes, got {}",
                self.topology,
                self.nodes.len()
            )));
        }

        let extra = self.behavior.difference(self.topology.allowed_behavior());
        if !extra.is_empty() {
            return Err(FEAError::unsupported(format!(
                "{extra:?} cannot be formulated on {:?}",
                self.topology
            )));
        }

        for (eb, timo) in [
            (Behavior::BEAM_Y_EULER_BERNOULLI, Behavior::BEAM_Y_TIMOSHENKO),
            (Behavior::BEAM_Z_EULER_BERNOULLI, Behavior::BEAM_Z_TIMOSHENKO),
        ] {
            if self.behavior.contains(eb | timo) {
                return Err(FEAError::unsupported(format!(
                    "{:?} selects two bending theories for one plane",
                    eb | timo
                )));
            }
        }

        if self.behavior.is_empty() {
            warn!("element {}: no behavior selected, matrices will be zero", self.id);
        }
        Ok(())
    }

    /// Helpers selected by the behavior flags
    pub fn helpers(&self) -> FEAResult<Vec<Box<dyn ElementHelper>>> {
        self.attributed(self.helpers_inner())
    }

    fn helpers_inner(&self) -> FEAResult<Vec<Box<dyn ElementHelper>>> {
        self.validate_inner()?;
        let helpers = helpers_for(self)?;
        debug!(
            "element {}: helpers {:?}",
            self.id,
            helpers.iter().map(|h| h.kind()).collect::<Vec<HelperKind>>()
        );
        Ok(helpers)
    }

    /// Local axes, rebuilt when any node moved since the last call
    pub fn transformation(&self) -> FEAResult<TransformManager> {
        self.attributed(self.transformation_inner())
    }

    fn transformation_inner(&self) -> FEAResult<TransformManager> {
        let positions: Vec<Vec3> = self.nodes.iter().map(Node::location).collect();
        let mut cache = self.cache();
        if let Some(c) = cache.as_ref() {
            if c.positions == positions {
                return Ok(c.transform);
            }
        }

        let tol = self.options.geometry_tolerance;
        let transform = match (self.topology, positions.as_slice()) {
            (Topology::Bar2, [a, b]) => TransformManager::bar(*a, *b, self.web_rotation, tol)?,
            (Topology::Triangle3, [a, b, c]) => TransformManager::triangle(&[*a, *b, *c], tol)?,
            (Topology::Quad4, [a, b, c, d]) => TransformManager::quad(&[*a, *b, *c, *d], tol)?,
            (Topology::Tetra4, _) => TransformManager::identity(),
            (t, p) => {
                return Err(FEAError::unsupported(format!(
                    "{t:?} with {} nodes has no local axes",
                    p.len()
                )))
            }
        };
        trace!("element {}: lambda rebuilt", self.id);
        *cache = Some(LambdaCache {
            positions,
            transform,
        });
        Ok(transform)
    }

    /// Distance between the two nodes of a bar
    pub fn length(&self) -> FEAResult<f64> {
        if self.topology != Topology::Bar2 || self.nodes.len() != 2 {
            return Err(FEAError::unsupported(format!(
                "length of a {:?} element",
                self.topology
            ))
            .in_element(self.id));
        }
        let l = self.nodes[0].distance_to(&self.nodes[1]);
        if l < self.options.geometry_tolerance {
            return Err(FEAError::degenerate("bar has zero length").in_element(self.id));
        }
        Ok(l)
    }

    /// Node positions in local axes relative to the first node
    pub fn local_node_coordinates(&self) -> FEAResult<Vec<Vec3>> {
        let t = self.transformation()?;
        let origin = self.nodes.first().map(Node::location).unwrap_or_else(Vec3::zeros);
        Ok(self
            .nodes
            .iter()
            .map(|n| t.global_to_local_vector(&(n.location() - origin)))
            .collect())
    }

    /// Global DOF indices of the canonical layout
    pub fn global_dof_indices(&self) -> Vec<usize> {
        self.nodes.iter().flat_map(|n| n.dofs).collect()
    }

    /// Canonical indices of the released bar end DOFs
    fn released_indices(&self) -> Vec<usize> {
        if self.topology != Topology::Bar2 {
            return Vec::new();
        }
        let start = self.start_release.released_dofs().into_iter().map(Dof::index);
        let end = self.end_release.released_dofs().into_iter().map(|d| 6 + d.index());
        start.chain(end).collect()
    }

    fn compose(&self, kind: MatrixKind) -> FEAResult<Mat> {
        let helpers = self.helpers_inner()?;
        let size = 6 * self.nodes.len();
        let mut k = Mat::zeros(size, size);

        for h in &helpers {
            let m = match kind {
                MatrixKind::Stiffness => h.local_stiffness_matrix(self)?,
                MatrixKind::Mass => h.local_mass_matrix(self)?,
                MatrixKind::Damping => h.local_damping_matrix(self)?,
            };
            debug!(
                "element {}: {:?} {:?} is {}x{}",
                self.id,
                h.kind(),
                kind,
                m.nrows(),
                m.ncols()
            );
            scatter_matrix(&mut k, &m, &h.dof_order(self))?;
        }

        if kind == MatrixKind::Stiffness && self.behavior.contains(Behavior::DRILLING_DOF) {
            self.add_drilling_stiffness(&mut k);
        }

        zero_dofs(&mut k, &self.released_indices())?;
        Ok(k)
    }

    /// Fill empty Rz diagonals with a fraction of the largest diagonal term
    fn add_drilling_stiffness(&self, k: &mut Mat) {
        let value = self.options.drilling_stiffness_ratio * max_abs_diagonal(k);
        for node in 0..self.nodes.len() {
            let i = 6 * node + Dof::Rz.index();
            if k[(i, i)] == 0.0 {
                k[(i, i)] = value;
            }
        }
        trace!("element {}: drilling stiffness {value:e}", self.id);
    }

    /// Composed local stiffness, `6n x 6n`
    pub fn local_stiffness_matrix(&self) -> FEAResult<Mat> {
        self.attributed(self.compose(MatrixKind::Stiffness))
    }

    pub fn local_mass_matrix(&self) -> FEAResult<Mat> {
        self.attributed(self.compose(MatrixKind::Mass))
    }

    pub fn local_damping_matrix(&self) -> FEAResult<Mat> {
        self.attributed(self.compose(MatrixKind::Damping))
    }

    fn global_matrix(&self, kind: MatrixKind) -> FEAResult<Mat> {
        let local = self.compose(kind)?;
        self.transformation_inner()?.to_global_matrix(&local)
    }

    /// `T^T K T`
    pub fn global_stiffness_matrix(&self) -> FEAResult<Mat> {
        self.attributed(self.global_matrix(MatrixKind::Stiffness))
    }

    pub fn global_mass_matrix(&self) -> FEAResult<Mat> {
        self.attributed(self.global_matrix(MatrixKind::Mass))
    }

    pub fn global_damping_matrix(&self) -> FEAResult<Mat> {
        self.attributed(self.global_matrix(MatrixKind::Damping))
    }

    /// True when every helper has a handler for `load`
    pub fn can_handle(&self, load: &ElementalLoad) -> bool {
        match self.helpers_inner() {
            Ok(helpers) => helpers.iter().all(|h| handler_for(self, h.as_ref(), load).is_ok()),
            Err(_) => false,
        }
    }

    fn equivalent_loads_inner(&self, load: &ElementalLoad) -> FEAResult<Vec<Force>> {
        let mut total = vec![Force::zero(); self.nodes.len()];
        for h in self.helpers_inner()? {
            let handler = handler_for(self, h.as_ref(), load)?;
            trace!("element {}: {} handles {:?}", self.id, handler.name(), h.kind());
            let forces = handler.local_equivalent_nodal_loads(self, h.as_ref(), load)?;
            if forces.len() != total.len() {
                return Err(FEAError::DimensionError {
                    expected: (total.len(), 6),
                    actual: (forces.len(), 6),
                });
            }
            for (t, f) in total.iter_mut().zip(forces) {
                *t += f;
            }
        }
        Ok(total)
    }

    /// Equivalent nodal loads in local axes, one force per node
    pub fn local_equivalent_nodal_loads(&self, load: &ElementalLoad) -> FEAResult<Vec<Force>> {
        self.attributed(self.equivalent_loads_inner(load))
    }

    pub fn global_equivalent_nodal_loads(&self, load: &ElementalLoad) -> FEAResult<Vec<Force>> {
        self.attributed(self.equivalent_loads_inner(load).and_then(|local| {
            let t = self.transformation_inner()?;
            Ok(local.iter().map(|f| t.force_to_global(f)).collect())
        }))
    }

    /// Nodal displacements from global to local axes
    pub fn local_displacements(&self, global: &[Displacement]) -> FEAResult<Vec<Displacement>> {
        let t = self.transformation()?;
        Ok(global.iter().map(|d| t.displacement_to_local(d)).collect())
    }

    fn canonical_vector(&self, displacements: &[Displacement]) -> FEAResult<Vector> {
        if displacements.len() != self.nodes.len() {
            return Err(FEAError::DimensionError {
                expected: (self.nodes.len(), 6),
                actual: (displacements.len(), 6),
            });
        }
        Ok(Vector::from_iterator(
            6 * displacements.len(),
            displacements.iter().flat_map(|d| d.to_array()),
        ))
    }

    fn check_iso(&self, iso: IsoPoint) -> FEAResult<()> {
        self.topology.domain().check(iso, self.options.iso_tolerance)
    }

    /// Internal force at `iso` caused by local nodal displacements
    pub fn local_internal_force_at(&self, displacements: &[Displacement], iso: IsoPoint) -> FEAResult<Force> {
        self.attributed((|| -> FEAResult<Force> {
            self.check_iso(iso)?;
            let u = self.canonical_vector(displacements)?;
            let mut force = Force::zero();
            for h in self.helpers_inner()? {
                let hu = gather(&u, &h.dof_order(self))?;
                force += h.local_internal_force_at(self, &hu, iso)?;
            }
            Ok(force)
        })())
    }

    /// Interpolated displacement at `iso` from local nodal displacements
    pub fn local_displacement_at(&self, displacements: &[Displacement], iso: IsoPoint) -> FEAResult<Displacement> {
        self.attributed((|| -> FEAResult<Displacement> {
            self.check_iso(iso)?;
            let u = self.canonical_vector(displacements)?;
            let mut d = Displacement::zero();
            for h in self.helpers_inner()? {
                let hu = gather(&u, &h.dof_order(self))?;
                d += h.local_displacement_at(self, &hu, iso)?;
            }
            Ok(d)
        })())
    }

    /// `D B u` of every helper at `iso`
    pub fn local_stresses_at(
        &self,
        displacements: &[Displacement],
        iso: IsoPoint,
    ) -> FEAResult<Vec<(HelperKind, Vector)>> {
        self.attributed((|| -> FEAResult<Vec<(HelperKind, Vector)>> {
            self.check_iso(iso)?;
            let u = self.canonical_vector(displacements)?;
            self.helpers_inner()?
                .iter()
                .map(|h| {
                    let hu = gather(&u, &h.dof_order(self))?;
                    Ok((h.kind(), h.local_stress_at(self, &hu, iso)?))
                })
                .collect()
        })())
    }

    /// Internal force at `iso` due to `load` on an element with fixed nodes
    pub fn local_load_internal_force_at(&self, load: &ElementalLoad, iso: IsoPoint) -> FEAResult<Force> {
        self.attributed((|| -> FEAResult<Force> {
            self.check_iso(iso)?;
            let mut force = Force::zero();
            for h in self.helpers_inner()? {
                let handler = handler_for(self, h.as_ref(), load)?;
                force += handler.local_load_internal_force_at(self, h.as_ref(), load, iso)?;
            }
            Ok(force)
        })())
    }

    /// Displacement at `iso` due to `load` on an element with fixed nodes
    pub fn local_load_displacement_at(&self, load: &ElementalLoad, iso: IsoPoint) -> FEAResult<Displacement> {
        self.attributed((|| -> FEAResult<Displacement> {
            self.check_iso(iso)?;
            let mut d = Displacement::zero();
            for h in self.helpers_inner()? {
                let handler = handler_for(self, h.as_ref(), load)?;
                d += handler.local_load_displacement_at(self, h.as_ref(), load, iso)?;
            }
            Ok(d)
        })())
    }

    /// Local coordinates of an iso point, relative to the first node
    pub fn iso_to_local(&self, iso: IsoPoint) -> FEAResult<Vec3> {
        self.attributed((|| -> FEAResult<Vec3> {
            self.check_iso(iso)?;
            let nodes = self.local_node_coordinates()?;
            self.topology.domain().iso_to_local(&nodes, iso)
        })())
    }

    /// Iso coordinates of a local point, relative to the first node
    pub fn local_to_iso(&self, p: Vec3) -> FEAResult<IsoPoint> {
        self.attributed((|| -> FEAResult<IsoPoint> {
            let nodes = self.local_node_coordinates()?;
            self.topology.domain().local_to_iso(
                &nodes,
                p,
                self.options.geometry_tolerance,
                self.options.iso_tolerance,
            )
        })())
    }
}
