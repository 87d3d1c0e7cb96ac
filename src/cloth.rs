//! The cloth: a particle grid, its springs, and the step loop that drives them.

use crate::collision::Shape;
use crate::config::{clamp_damping, ClothConfig, SpringMode};
use crate::constraint;
use crate::error::ClothError;
use crate::float::Float;
use crate::grid::{ClothLayout, Corners, GridMetrics, Resolution, Topology};
use crate::integrator::{Integrator, Stepper};
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::spring::{Spring, SpringKind};
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// A mass-spring cloth.
///
/// Owns its particles (row-major, index `row * width + col`) and the three
/// spring sets that reference them by index. One step runs, in order:
/// forces, integration, constraint correction. Collisions are resolved
/// afterwards against whatever shapes the caller supplies, and normals are
/// recomputed on demand for rendering.
pub struct Cloth<F: Float> {
    particles: AllocVec<Particle<F>>,
    springs: [AllocVec<Spring<F>>; 3],
    width: usize,
    height: usize,
    metrics: GridMetrics<F>,
    config: ClothConfig<F>,
    stepper: Stepper<F>,
    last_dt: F,
}

impl<F: Float> Cloth<F> {
    /// Build a `width` x `height` cloth spanning `corners`.
    pub fn new(
        width: usize,
        height: usize,
        corners: Corners<F>,
        config: ClothConfig<F>,
    ) -> Result<Self, ClothError> {
        let topo = Topology::build(width, height, &corners, &config)?;
        Ok(Cloth {
            particles: topo.particles,
            springs: topo.springs,
            width: topo.width,
            height: topo.height,
            metrics: topo.metrics,
            stepper: Stepper::new(config.integrator),
            config,
            last_dt: F::zero(),
        })
    }

    /// Build a cloth with `density` particles along its shorter edge.
    pub fn with_density(
        density: usize,
        corners: Corners<F>,
        config: ClothConfig<F>,
    ) -> Result<Self, ClothError> {
        let (width, height) = Resolution::Density(density).resolve(&corners)?;
        Self::new(width, height, corners, config)
    }

    /// Build a cloth from a scene description, pinning the flagged corners.
    pub fn from_layout(layout: &ClothLayout<F>, config: ClothConfig<F>) -> Result<Self, ClothError> {
        let (width, height) = layout.resolution.resolve(&layout.corners)?;
        let mut cloth = Self::new(width, height, layout.corners, config)?;
        let [ul, ur, lr, ll] = layout.pinned;
        cloth.set_fixed_corners(ul, ur, lr, ll);
        Ok(cloth)
    }

    // ----------------------------------------------------------------------
    // Driving
    // ----------------------------------------------------------------------

    /// Add `accel` to every free particle (gravity-like).
    pub fn apply_acceleration(&mut self, accel: Vec3<F>) {
        for p in self.particles.iter_mut() {
            p.apply_acceleration(accel);
        }
    }

    /// Add `force` to every free particle, scaled by its inverse mass.
    pub fn apply_force(&mut self, force: Vec3<F>) {
        for p in self.particles.iter_mut() {
            p.apply_force(force);
        }
    }

    /// Aerodynamic-style loading from `wind`.
    ///
    /// Each triangle of the surface receives `n (n . wind) * area`, with `n`
    /// its unit normal, split evenly across its three vertices. Surfaces
    /// edge-on to the wind feel nothing.
    pub fn apply_triangle_force(&mut self, wind: Vec3<F>) {
        let third = F::one() / F::from_f32(3.0);
        for row in 0..self.height - 1 {
            for col in 0..self.width - 1 {
                for [a, b, c] in self.quad_triangles(col, row) {
                    let face = self.face_normal(a, b, c);
                    let double_area = face.length();
                    if double_area.is_near_zero(F::from_f32(1e-12)) {
                        continue;
                    }
                    let n = face.scale(F::one() / double_area);
                    let area = double_area * F::half();
                    let share = n.scale(n.dot(wind) * area * third);
                    self.particles[a].apply_force(share);
                    self.particles[b].apply_force(share);
                    self.particles[c].apply_force(share);
                }
            }
        }
    }

    /// Advance the cloth by `dt`.
    ///
    /// Applies configured gravity and wind, spring forces in force mode,
    /// integrates, then corrects spring lengths (relaxation in constraint
    /// mode, tolerance band in force mode). A non-positive or non-finite
    /// `dt` does nothing.
    pub fn step<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        if !(dt > F::zero()) || !dt.is_finite() {
            log::warn!("ignoring step with dt = {}", dt);
            return;
        }

        // 1. Forces
        let gravity = self.config.gravity;
        if gravity != Vec3::zero() {
            self.apply_acceleration(gravity);
        }
        let wind = self.config.wind;
        if wind != Vec3::zero() {
            self.apply_triangle_force(wind);
        }
        if self.config.spring_mode == SpringMode::Force {
            for set in self.springs.iter() {
                for s in set.iter() {
                    s.apply_force(&mut self.particles);
                }
            }
        }
        observer.on_forces();

        // 2. Integrate
        self.stepper.advance(&mut self.particles, dt, self.config.damping);
        self.last_dt = dt;
        observer.on_integrate();

        // 3. Constrain
        let corrected = match (self.config.spring_mode, self.config.tolerance) {
            (SpringMode::Constraint, _) => {
                let mut moved = false;
                for i in 0..self.config.iterations {
                    for set in self.springs.iter() {
                        for s in set.iter() {
                            moved |= constraint::relax(s, &mut self.particles);
                        }
                    }
                    observer.on_constraint_iteration(i);
                }
                moved
            }
            (SpringMode::Force, Some(_)) => {
                let mut moved = false;
                for set in self.springs.iter() {
                    for s in set.iter() {
                        moved |= constraint::clamp_to_band(s, &mut self.particles);
                    }
                }
                observer.on_constraint_iteration(0);
                moved
            }
            (SpringMode::Force, None) => false,
        };
        if corrected {
            self.sync_velocities(dt);
        }

        observer.on_step_complete();
    }

    /// Resolve collisions of every free particle against `shapes`, using the
    /// last step's `dt`. Returns how many contacts were resolved.
    pub fn resolve_collisions(&mut self, shapes: &[Shape<F>]) -> usize {
        let dt = self.last_dt;
        let mut contacts = 0;
        for p in self.particles.iter_mut() {
            for shape in shapes {
                if shape.collide(p, dt) {
                    contacts += 1;
                }
            }
        }
        if contacts > 0 {
            log::trace!("resolved {} contacts", contacts);
        }
        contacts
    }

    /// Step, then collide. Convenience for drivers that own their shapes.
    pub fn step_with_shapes<O: StepObserver>(&mut self, dt: F, shapes: &[Shape<F>], observer: &mut O) -> usize {
        self.step(dt, observer);
        let contacts = self.resolve_collisions(shapes);
        observer.on_collisions(contacts);
        contacts
    }

    /// Re-derive velocity from net displacement after position corrections.
    ///
    /// Verlet already reads velocity from positions; Euler has to be told,
    /// or it would keep pushing clamped particles into their springs.
    fn sync_velocities(&mut self, dt: F) {
        if dt.is_near_zero(F::from_f32(1e-9)) {
            return;
        }
        let inv_dt = F::one() / dt;
        for p in self.particles.iter_mut() {
            if !p.is_fixed() {
                p.velocity = (p.pos - p.prev_pos).scale(inv_dt);
            }
        }
    }

    // ----------------------------------------------------------------------
    // Normals
    // ----------------------------------------------------------------------

    /// Recompute vertex normals as the area-weighted sum of adjacent face
    /// normals. Call after the geometry changes and before reading normals.
    pub fn recompute_normals(&mut self) {
        for p in self.particles.iter_mut() {
            p.reset_normal();
        }
        for row in 0..self.height - 1 {
            for col in 0..self.width - 1 {
                for [a, b, c] in self.quad_triangles(col, row) {
                    let face = self.face_normal(a, b, c);
                    self.particles[a].accumulate_normal(face);
                    self.particles[b].accumulate_normal(face);
                    self.particles[c].accumulate_normal(face);
                }
            }
        }
    }

    /// The two triangles of the quad whose upper-left particle is `(col, row)`.
    fn quad_triangles(&self, col: usize, row: usize) -> [[usize; 3]; 2] {
        let i = self.index(col, row);
        let right = i + 1;
        let down = i + self.width;
        let diag = down + 1;
        [[i, right, down], [right, diag, down]]
    }

    /// Unnormalized normal of triangle `(a, b, c)`; its length is twice the area.
    fn face_normal(&self, a: usize, b: usize, c: usize) -> Vec3<F> {
        let p0 = self.particles[a].pos;
        (self.particles[b].pos - p0).cross(self.particles[c].pos - p0)
    }

    // ----------------------------------------------------------------------
    // Configuration
    // ----------------------------------------------------------------------

    /// Pin or release the four corners: upper-left, upper-right,
    /// lower-right, lower-left.
    pub fn set_fixed_corners(&mut self, up_left: bool, up_right: bool, low_right: bool, low_left: bool) {
        let (w, h) = (self.width, self.height);
        let corners = [(0, 0, up_left), (w - 1, 0, up_right), (w - 1, h - 1, low_right), (0, h - 1, low_left)];
        for (col, row, fixed) in corners {
            let idx = self.index(col, row);
            self.particles[idx].set_fixed(fixed);
        }
    }

    pub fn set_fixed(&mut self, col: usize, row: usize, fixed: bool) -> Result<(), ClothError> {
        let idx = self.checked_index(col, row)?;
        self.particles[idx].set_fixed(fixed);
        Ok(())
    }

    /// Pin every particle of the top row.
    pub fn pin_top_row(&mut self) {
        for p in self.particles[..self.width].iter_mut() {
            p.set_fixed(true);
        }
    }

    /// Move a pinned particle. Free particles are left to the solver.
    pub fn move_pin(&mut self, col: usize, row: usize, pos: Vec3<F>) -> Result<(), ClothError> {
        let idx = self.checked_index(col, row)?;
        let p = &mut self.particles[idx];
        if p.is_fixed() {
            p.prev_pos = pos;
            p.pos = pos;
        }
        Ok(())
    }

    /// Clamped to [0, 1).
    pub fn set_damping(&mut self, damping: F) {
        self.config.damping = clamp_damping(damping);
    }

    /// Set the tolerance band of every spring and enable banding in force mode.
    pub fn set_spring_tolerance(&mut self, tolerance: F) {
        let tolerance = if tolerance.is_finite() { tolerance.max(F::zero()) } else { F::zero() };
        self.config.tolerance = Some(tolerance);
        for set in self.springs.iter_mut() {
            for s in set.iter_mut() {
                s.set_tolerance(tolerance);
            }
        }
    }

    /// Disable tolerance banding in force mode.
    pub fn clear_spring_tolerance(&mut self) {
        self.config.tolerance = None;
    }

    /// Set the unit stiffness of every spring, whatever its kind.
    pub fn set_spring_stiffness(&mut self, stiffness: F) {
        for kind in SpringKind::ALL {
            self.set_kind_stiffness(kind, stiffness);
        }
    }

    pub fn set_kind_stiffness(&mut self, kind: SpringKind, stiffness: F) {
        self.config.stiffness[kind.slot()] = stiffness;
        for s in self.springs[kind.slot()].iter_mut() {
            s.set_unit_stiffness(stiffness);
        }
    }

    pub fn set_integrator(&mut self, scheme: Integrator) {
        self.config.integrator = scheme;
        self.stepper.set_scheme(scheme);
        // Verlet reads velocity from history; make the history match.
        for p in self.particles.iter_mut() {
            p.prev_pos = p.pos;
            p.velocity = Vec3::zero();
        }
    }

    pub fn set_spring_mode(&mut self, mode: SpringMode) {
        self.config.spring_mode = mode;
    }

    pub fn set_gravity(&mut self, gravity: Vec3<F>) {
        self.config.gravity = gravity;
    }

    pub fn set_wind(&mut self, wind: Vec3<F>) {
        self.config.wind = wind;
    }

    // ----------------------------------------------------------------------
    // Queries
    // ----------------------------------------------------------------------

    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    fn checked_index(&self, col: usize, row: usize) -> Result<usize, ClothError> {
        if col < self.width && row < self.height {
            Ok(self.index(col, row))
        } else {
            Err(ClothError::ParticleOutOfBounds { col, row, width: self.width, height: self.height })
        }
    }

    pub fn particle(&self, col: usize, row: usize) -> Option<&Particle<F>> {
        self.checked_index(col, row).ok().map(|i| &self.particles[i])
    }

    pub fn position_at(&self, col: usize, row: usize) -> Option<Vec3<F>> {
        self.particle(col, row).map(|p| p.pos)
    }

    /// Unit normal at `(col, row)` as of the last `recompute_normals`.
    pub fn normal_at(&self, col: usize, row: usize) -> Option<Vec3<F>> {
        self.particle(col, row).map(|p| p.normal())
    }

    pub fn particles(&self) -> &[Particle<F>] {
        &self.particles
    }

    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.particles.iter().map(|p| p.pos).collect()
    }

    pub fn springs_of_kind(&self, kind: SpringKind) -> &[Spring<F>] {
        &self.springs[kind.slot()]
    }

    /// Endpoint positions of every spring of `kind`, for wireframe drawing.
    pub fn spring_segments(&self, kind: SpringKind) -> impl Iterator<Item = (Vec3<F>, Vec3<F>)> + '_ {
        self.springs[kind.slot()].iter().map(move |s| s.endpoints(&self.particles))
    }

    pub fn spring_count(&self, kind: SpringKind) -> usize {
        self.springs[kind.slot()].len()
    }

    /// Effective constant of the first spring of each kind (stretch, shear,
    /// bend), or `None` for a kind the grid is too small to have.
    pub fn stiffness_stats(&self) -> [Option<F>; 3] {
        let first = |kind: SpringKind| self.springs[kind.slot()].first().map(|s| s.stiffness());
        [first(SpringKind::Stretch), first(SpringKind::Shear), first(SpringKind::Bend)]
    }

    pub fn metrics(&self) -> &GridMetrics<F> {
        &self.metrics
    }

    pub fn config(&self) -> &ClothConfig<F> {
        &self.config
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn particle_count(&self) -> usize { self.particles.len() }
}
