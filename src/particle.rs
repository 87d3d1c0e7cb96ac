//! Cloth particles: point masses addressed by their grid coordinate.

use crate::float::Float;
use crate::vec::Vec3;

/// Column/row address of a particle inside its cloth grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub col: usize,
    pub row: usize,
}

impl GridCoord {
    pub fn new(col: usize, row: usize) -> Self {
        GridCoord { col, row }
    }
}

/// A point mass of the cloth.
///
/// Both integration schemes share this struct: Euler reads and writes
/// `velocity` directly, Verlet derives it from `pos - prev_pos`. Either way
/// `velocity` holds the particle's current velocity after a step, which is
/// what collision response works with.
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub pos: Vec3<F>,
    pub prev_pos: Vec3<F>,
    pub velocity: Vec3<F>,
    pub acceleration: Vec3<F>,
    pub mass: F,
    pub inv_mass: F,
    normal_sum: Vec3<F>,
    fixed: bool,
    coord: GridCoord,
}

impl<F: Float> Particle<F> {
    pub fn new(pos: Vec3<F>, mass: F, coord: GridCoord) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            velocity: Vec3::zero(),
            acceleration: Vec3::zero(),
            mass,
            inv_mass: inverse_mass(mass),
            normal_sum: Vec3::zero(),
            fixed: false,
            coord,
        }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Pin or release the particle. Pinning also drops any stored motion so
    /// a later release starts from rest.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
        self.prev_pos = self.pos;
        self.velocity = Vec3::zero();
        self.acceleration = Vec3::zero();
    }

    pub fn apply_force(&mut self, force: Vec3<F>) {
        if !self.fixed {
            self.acceleration = self.acceleration + force.scale(self.inv_mass);
        }
    }

    pub fn apply_acceleration(&mut self, accel: Vec3<F>) {
        if !self.fixed {
            self.acceleration = self.acceleration + accel;
        }
    }

    /// Move a free particle by `delta`. Used by the constraint passes.
    pub fn offset(&mut self, delta: Vec3<F>) {
        if !self.fixed {
            self.pos = self.pos + delta;
        }
    }

    /// Place a free particle at `pos` moving with `velocity`, keeping the
    /// Verlet history consistent with that velocity over `dt`.
    pub fn settle(&mut self, pos: Vec3<F>, velocity: Vec3<F>, dt: F) {
        if self.fixed {
            return;
        }
        self.pos = pos;
        self.velocity = velocity;
        self.prev_pos = pos - velocity.scale(dt);
    }

    /// Unit normal from the accumulated face normals, zero if none.
    pub fn normal(&self) -> Vec3<F> {
        self.normal_sum.normalize()
    }

    pub(crate) fn reset_normal(&mut self) {
        self.normal_sum = Vec3::zero();
    }

    pub(crate) fn accumulate_normal(&mut self, n: Vec3<F>) {
        self.normal_sum = self.normal_sum + n;
    }
}

fn inverse_mass<F: Float>(mass: F) -> F {
    if mass.is_near_zero(F::from_f32(1e-10)) {
        F::zero()
    } else {
        F::one() / mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle() -> Particle<f32> {
        Particle::new(Vec3::new(1.0, 2.0, 3.0), 0.5, GridCoord::new(0, 0))
    }

    #[test]
    fn force_divided_by_mass() {
        let mut p = particle();
        p.apply_force(Vec3::new(1.0, 0.0, 0.0));
        assert!((p.acceleration.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn fixed_particle_ignores_input() {
        let mut p = particle();
        p.set_fixed(true);
        p.apply_force(Vec3::new(100.0, 0.0, 0.0));
        p.apply_acceleration(Vec3::new(0.0, -9.81, 0.0));
        p.offset(Vec3::new(1.0, 1.0, 1.0));
        p.settle(Vec3::zero(), Vec3::zero(), 0.01);
        assert_eq!(p.acceleration, Vec3::zero());
        assert_eq!(p.pos, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn settle_keeps_history_consistent() {
        let mut p = particle();
        p.settle(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 0.0, 0.0), 0.5);
        assert_eq!(p.prev_pos, Vec3::new(-1.0, 1.0, 0.0));
    }

    #[test]
    fn normal_is_normalized_on_read() {
        let mut p = particle();
        p.accumulate_normal(Vec3::new(0.0, 3.0, 0.0));
        p.accumulate_normal(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p.normal(), Vec3::new(0.0, 1.0, 0.0));
        p.reset_normal();
        assert_eq!(p.normal(), Vec3::zero());
    }
}
