//! Time integration of particle state.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec3;

/// Numerical scheme used to advance particles. Chosen per cloth.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Integrator {
    /// Semi-implicit Euler: velocity first, then position from the new velocity.
    /// The new velocity is scaled by `1 - damping` before it moves the
    /// particle; configure zero damping for the undamped scheme.
    #[default]
    Euler,
    /// Position Verlet. Velocity is implied by `pos - prev_pos`.
    Verlet,
}

/// Per-cloth integration state carried between steps.
///
/// Holds the previous timestep so Verlet can rescale the implied velocity
/// when `dt` varies between frames.
#[derive(Copy, Clone, Debug, Default)]
pub struct Stepper<F: Float> {
    pub scheme: Integrator,
    prev_dt: Option<F>,
}

impl<F: Float> Stepper<F> {
    pub fn new(scheme: Integrator) -> Self {
        Stepper { scheme, prev_dt: None }
    }

    /// Switch scheme. Restarts the timestep history.
    pub fn set_scheme(&mut self, scheme: Integrator) {
        self.scheme = scheme;
        self.prev_dt = None;
    }

    /// `dt / prev_dt`, or 1 on the first step or when the previous step
    /// was too small to divide by.
    pub fn dt_ratio(&self, dt: F) -> F {
        match self.prev_dt {
            Some(prev) if prev.is_finite() && !prev.is_near_zero(F::from_f32(1e-9)) => dt / prev,
            _ => F::one(),
        }
    }

    /// Advance every particle by `dt`, consuming (and zeroing) its
    /// accumulated acceleration.
    pub fn advance(&mut self, particles: &mut [Particle<F>], dt: F, damping: F) {
        let keep = F::one() - damping;
        match self.scheme {
            Integrator::Euler => {
                for p in particles.iter_mut() {
                    euler(p, dt, keep);
                }
            }
            Integrator::Verlet => {
                let ratio = self.dt_ratio(dt);
                for p in particles.iter_mut() {
                    verlet(p, dt, keep, ratio);
                }
            }
        }
        self.prev_dt = Some(dt);
    }
}

fn euler<F: Float>(p: &mut Particle<F>, dt: F, keep: F) {
    if p.is_fixed() {
        return;
    }
    p.prev_pos = p.pos;
    p.velocity = (p.velocity + p.acceleration.scale(dt)).scale(keep);
    p.pos = p.pos + p.velocity.scale(dt);
    p.acceleration = Vec3::zero();
}

fn verlet<F: Float>(p: &mut Particle<F>, dt: F, keep: F, ratio: F) {
    if p.is_fixed() {
        return;
    }
    let carried = (p.pos - p.prev_pos).scale(keep * ratio);
    let new_pos = p.pos + carried + p.acceleration.scale(dt * dt);
    p.prev_pos = p.pos;
    p.pos = new_pos;
    p.velocity = (p.pos - p.prev_pos).scale(F::one() / dt);
    p.acceleration = Vec3::zero();
}
