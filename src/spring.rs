//! Springs between pairs of cloth particles.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec3;

/// Role of a spring in the cloth topology.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpringKind {
    /// Axis-adjacent neighbours; resists stretching along rows and columns.
    Stretch,
    /// Diagonal neighbours; resists in-plane skew.
    Shear,
    /// Neighbours two steps apart; resists folding.
    Bend,
}

impl SpringKind {
    pub const ALL: [SpringKind; 3] = [SpringKind::Stretch, SpringKind::Shear, SpringKind::Bend];

    pub(crate) fn slot(self) -> usize {
        match self {
            SpringKind::Stretch => 0,
            SpringKind::Shear => 1,
            SpringKind::Bend => 2,
        }
    }
}

/// A spring connecting particles `a` and `b` of the owning cloth.
///
/// Endpoints are indices into the cloth's particle array and never change.
/// `unit_stiffness` is the constant of a spring of length one; the effective
/// constant is scaled by `1 / rest_length` so that any stretch of material
/// responds the same no matter how finely the cloth is subdivided.
#[derive(Clone, Debug, PartialEq)]
pub struct Spring<F: Float> {
    pub a: usize,
    pub b: usize,
    kind: SpringKind,
    rest_length: F,
    unit_stiffness: F,
    tolerance: F,
}

impl<F: Float> Spring<F> {
    /// Build a spring whose rest length is the current distance between the
    /// two particles. Returns `None` for coincident particles.
    pub fn between(
        a: usize,
        b: usize,
        particles: &[Particle<F>],
        kind: SpringKind,
        unit_stiffness: F,
        tolerance: F,
    ) -> Option<Self> {
        let rest_length = particles[a].pos.distance(particles[b].pos);
        if !(rest_length > F::zero()) || !rest_length.is_finite() {
            return None;
        }
        Some(Spring { a, b, kind, rest_length, unit_stiffness, tolerance })
    }

    pub fn kind(&self) -> SpringKind { self.kind }
    pub fn rest_length(&self) -> F { self.rest_length }
    pub fn unit_stiffness(&self) -> F { self.unit_stiffness }
    pub fn tolerance(&self) -> F { self.tolerance }

    /// Effective spring constant, `unit_stiffness / rest_length`.
    pub fn stiffness(&self) -> F {
        self.unit_stiffness / self.rest_length
    }

    pub fn set_unit_stiffness(&mut self, unit_stiffness: F) {
        self.unit_stiffness = unit_stiffness;
    }

    pub fn set_tolerance(&mut self, tolerance: F) {
        self.tolerance = tolerance;
    }

    /// Vector from endpoint `a` to endpoint `b`.
    pub fn span(&self, particles: &[Particle<F>]) -> Vec3<F> {
        particles[self.b].pos - particles[self.a].pos
    }

    pub fn current_length(&self, particles: &[Particle<F>]) -> F {
        self.span(particles).length()
    }

    /// Endpoint positions, for wireframe rendering.
    pub fn endpoints(&self, particles: &[Particle<F>]) -> (Vec3<F>, Vec3<F>) {
        (particles[self.a].pos, particles[self.b].pos)
    }

    /// Hooke force acting on endpoint `a`; `b` receives the negation.
    /// Zero when the endpoints coincide.
    pub fn force(&self, particles: &[Particle<F>]) -> Vec3<F> {
        let span = self.span(particles);
        let len = span.length();
        if len.is_near_zero(F::from_f32(1e-10)) {
            return Vec3::zero();
        }
        let magnitude = self.stiffness() * (len - self.rest_length);
        span.scale(magnitude / len)
    }

    /// Accumulate this spring's force into both endpoints' acceleration.
    pub fn apply_force(&self, particles: &mut [Particle<F>]) {
        let force = self.force(particles);
        particles[self.a].apply_force(force);
        particles[self.b].apply_force(-force);
    }
}
