//! Configuration types for cloth simulation.

use crate::float::Float;
use crate::integrator::Integrator;
use crate::spring::SpringKind;
use crate::vec::Vec3;

/// How springs act on the cloth.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SpringMode {
    /// Springs produce Hooke forces that feed the integrator. If the
    /// configuration has a tolerance, lengths outside the band are clamped
    /// after integration.
    Force,
    /// No spring forces; every spring relaxes its endpoints toward the rest
    /// length after integration. Stable for any stiffness.
    #[default]
    Constraint,
}

/// How particle mass is assigned at construction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MassModel<F: Float> {
    /// Every particle has this mass.
    PerParticle(F),
    /// The cloth weighs this much, shared evenly between particles.
    Total(F),
}

impl<F: Float> MassModel<F> {
    pub fn particle_mass(&self, particle_count: usize) -> F {
        match *self {
            MassModel::PerParticle(m) => m,
            MassModel::Total(m) => m / F::from_usize(particle_count.max(1)),
        }
    }
}

/// Configuration of a cloth and its solver.
///
/// # Builder Pattern
/// ```
/// use weft::config::{ClothConfig, SpringMode};
/// use weft::integrator::Integrator;
/// use weft::vec::Vec3;
///
/// let config: ClothConfig<f32> = ClothConfig::new()
///     .with_integrator(Integrator::Verlet)
///     .with_spring_mode(SpringMode::Force)
///     .with_gravity(Vec3::new(0.0, -9.81, 0.0))
///     .with_damping(0.02)
///     .with_tolerance(Some(0.1));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClothConfig<F: Float> {
    /// Integration scheme. Default: Euler.
    pub integrator: Integrator,
    /// Whether springs act through forces or position constraints.
    /// Default: constraint.
    pub spring_mode: SpringMode,
    /// Fraction of velocity removed each step, in [0, 1). Default: 0.01.
    pub damping: F,
    /// Fractional band for post-integration clamping in force mode.
    /// `None` disables it. Default: `Some(0.1)`.
    pub tolerance: Option<F>,
    /// Unit stiffness per spring kind (stretch, shear, bend). Default: 10 each.
    pub stiffness: [F; 3],
    /// Relaxation sweeps per step in constraint mode. Default: 1.
    pub iterations: usize,
    /// Acceleration added to every free particle each step. Default: zero.
    pub gravity: Vec3<F>,
    /// Wind velocity applied through triangle normals each step. Default: zero.
    pub wind: Vec3<F>,
    /// Particle mass. Default: 0.001 per particle.
    pub mass: MassModel<F>,
}

impl<F: Float> ClothConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        ClothConfig {
            integrator: Integrator::Euler,
            spring_mode: SpringMode::Constraint,
            damping: F::from_f32(0.01),
            tolerance: Some(F::from_f32(0.1)),
            stiffness: [F::from_f32(10.0); 3],
            iterations: 1,
            gravity: Vec3::zero(),
            wind: Vec3::zero(),
            mass: MassModel::PerParticle(F::from_f32(0.001)),
        }
    }

    pub fn with_integrator(mut self, integrator: Integrator) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_spring_mode(mut self, mode: SpringMode) -> Self {
        self.spring_mode = mode;
        self
    }

    /// Set the damping factor. Clamped to [0, 1).
    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = clamp_damping(damping);
        self
    }

    /// Set the tolerance band. Negative values are clamped to zero.
    pub fn with_tolerance(mut self, tolerance: Option<F>) -> Self {
        self.tolerance = tolerance.map(|t| t.max(F::zero()));
        self
    }

    /// Set the unit stiffness of every spring kind.
    pub fn with_stiffness(mut self, stiffness: F) -> Self {
        self.stiffness = [stiffness; 3];
        self
    }

    pub fn with_kind_stiffness(mut self, kind: SpringKind, stiffness: F) -> Self {
        self.stiffness[kind.slot()] = stiffness;
        self
    }

    /// Set the number of relaxation sweeps. At least one.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_wind(mut self, wind: Vec3<F>) -> Self {
        self.wind = wind;
        self
    }

    pub fn with_mass(mut self, mass: MassModel<F>) -> Self {
        self.mass = mass;
        self
    }

    pub fn kind_stiffness(&self, kind: SpringKind) -> F {
        self.stiffness[kind.slot()]
    }

    /// Tolerance stored on new springs; zero when banding is disabled.
    pub(crate) fn spring_tolerance(&self) -> F {
        self.tolerance.unwrap_or_else(F::zero)
    }
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn clamp_damping<F: Float>(damping: F) -> F {
    let max = F::from_f32(0.999);
    if !damping.is_finite() || damping < F::zero() || damping > max {
        log::warn!("damping {} outside [0, 1), clamping", damping);
        if damping.is_finite() { damping.clamp(F::zero(), max) } else { F::zero() }
    } else {
        damping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config: ClothConfig<f32> = ClothConfig::new()
            .with_stiffness(4.0)
            .with_kind_stiffness(SpringKind::Bend, 1.0)
            .with_iterations(0);
        assert_eq!(config.kind_stiffness(SpringKind::Stretch), 4.0);
        assert_eq!(config.kind_stiffness(SpringKind::Bend), 1.0);
        assert_eq!(config.iterations, 1);
    }

    #[test]
    fn damping_clamped() {
        let config: ClothConfig<f64> = ClothConfig::new().with_damping(1.5);
        assert!(config.damping < 1.0);
        let config: ClothConfig<f64> = ClothConfig::new().with_damping(-0.2);
        assert_eq!(config.damping, 0.0);
    }

    #[test]
    fn total_mass_split_evenly() {
        let mass = MassModel::Total(2.0f32);
        assert_eq!(mass.particle_mass(8), 0.25);
    }
}
