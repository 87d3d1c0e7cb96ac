//! Position-based spring corrections applied after integration.
//!
//! Two strategies share the same shape: measure the spring, decide how far
//! each free endpoint should move, move it.
//!
//! - [`relax`]: pull both endpoints halfway toward the rest length. Replaces
//!   spring forces entirely in [`SpringMode::Constraint`](crate::SpringMode).
//! - [`clamp_to_band`]: only act once the length leaves
//!   `rest * (1 ± tolerance)`, and only far enough to reach the violated bound.
//!   Layered on top of spring forces in [`SpringMode::Force`](crate::SpringMode).

use crate::float::Float;
use crate::particle::Particle;
use crate::spring::Spring;

/// One relaxation of `spring` toward its rest length.
///
/// `delta = span * (1 - rest / len) * 0.5` is added to `a` and subtracted
/// from `b`. Fixed endpoints stay put; the other endpoint still only moves
/// its half. Returns whether anything moved.
pub fn relax<F: Float>(spring: &Spring<F>, particles: &mut [Particle<F>]) -> bool {
    let (a_fixed, b_fixed) = (particles[spring.a].is_fixed(), particles[spring.b].is_fixed());
    if a_fixed && b_fixed {
        return false;
    }

    let span = spring.span(particles);
    let len = span.length();
    if len.is_near_zero(F::from_f32(1e-10)) {
        return false; // degenerate
    }

    let delta = span.scale((F::one() - spring.rest_length() / len) * F::half());
    particles[spring.a].offset(delta);
    particles[spring.b].offset(-delta);
    true
}

/// Pull `spring` back inside its tolerance band, if it has left it.
///
/// The target length is the violated bound, not the rest length. The whole
/// correction is shared between free endpoints: half each, or all of it on
/// the free one when the other is fixed. Returns whether anything moved.
pub fn clamp_to_band<F: Float>(spring: &Spring<F>, particles: &mut [Particle<F>]) -> bool {
    let (a_fixed, b_fixed) = (particles[spring.a].is_fixed(), particles[spring.b].is_fixed());
    if a_fixed && b_fixed {
        return false;
    }

    let span = spring.span(particles);
    let len = span.length();
    if len.is_near_zero(F::from_f32(1e-10)) {
        return false;
    }

    let rest = spring.rest_length();
    let tolerance = spring.tolerance();
    let upper = rest * (F::one() + tolerance);
    let lower = rest * (F::one() - tolerance);
    let target = if len > upper {
        upper
    } else if len < lower {
        lower
    } else {
        return false;
    };

    let correction = span.scale((len - target) / len);
    if a_fixed {
        particles[spring.b].offset(-correction);
    } else if b_fixed {
        particles[spring.a].offset(correction);
    } else {
        let half = correction.scale(F::half());
        particles[spring.a].offset(half);
        particles[spring.b].offset(-half);
    }
    true
}
