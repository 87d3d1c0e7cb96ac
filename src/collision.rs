//! Collision of cloth particles against simple analytic shapes.
//!
//! Tests are purely geometric and never fail: a shape that cannot decide
//! (zero radius, zero-area quad, particle exactly at a sphere's center)
//! reports no contact.

use crate::float::Float;
use crate::particle::Particle;
use crate::vec::Vec3;

/// Default fraction of velocity a particle keeps after touching a sphere.
pub const SPHERE_RESTITUTION: f32 = 0.5;
/// Distance from a plane below which a particle counts as touching it.
pub const PLANE_THRESHOLD: f32 = 0.01;
/// Fraction of the quad's edge length the in-bounds test extends past the edges.
pub const PLANE_MARGIN: f32 = 0.1;
/// Share of the normal velocity reflected back by a plane.
pub const PLANE_FRICTION: f32 = 0.1;

/// An obstacle the cloth can collide with.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape<F: Float> {
    Sphere(Sphere<F>),
    Plane(Plane<F>),
}

impl<F: Float> Shape<F> {
    /// Test `particle` and push it out if it penetrates. `dt` is the length
    /// of the step that produced the particle's current state. Returns
    /// whether a collision was resolved.
    pub fn collide(&self, particle: &mut Particle<F>, dt: F) -> bool {
        if particle.is_fixed() {
            return false;
        }
        match self {
            Shape::Sphere(s) => s.collide(particle, dt),
            Shape::Plane(p) => p.collide(particle, dt),
        }
    }

    pub fn translate(&mut self, offset: Vec3<F>) {
        match self {
            Shape::Sphere(s) => s.center = s.center + offset,
            Shape::Plane(p) => p.translate(offset),
        }
    }
}

impl<F: Float> From<Sphere<F>> for Shape<F> {
    fn from(sphere: Sphere<F>) -> Self {
        Shape::Sphere(sphere)
    }
}

impl<F: Float> From<Plane<F>> for Shape<F> {
    fn from(plane: Plane<F>) -> Self {
        Shape::Plane(plane)
    }
}

/// Solid sphere. Particles inside are snapped to the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere<F: Float> {
    pub center: Vec3<F>,
    pub radius: F,
    /// Velocity scale applied on contact; 0 would freeze particles in place.
    pub restitution: F,
}

impl<F: Float> Sphere<F> {
    pub fn new(center: Vec3<F>, radius: F) -> Self {
        Sphere { center, radius, restitution: F::from_f32(SPHERE_RESTITUTION) }
    }

    pub fn with_restitution(mut self, restitution: F) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn move_to(&mut self, center: Vec3<F>) {
        self.center = center;
    }

    fn collide(&self, particle: &mut Particle<F>, dt: F) -> bool {
        if !(self.radius > F::zero()) || !self.radius.is_finite() {
            return false;
        }
        let offset = particle.pos - self.center;
        let dist = offset.length();
        if dist >= self.radius || dist.is_near_zero(F::from_f32(1e-10)) {
            return false;
        }
        let surface = self.center + offset.scale(self.radius / dist);
        let velocity = particle.velocity.scale(self.restitution);
        particle.settle(surface, velocity, dt);
        true
    }
}

impl<F: Float> Default for Sphere<F> {
    fn default() -> Self {
        Sphere::new(Vec3::from_f32(0.0, -1.0, 0.0), F::one())
    }
}

/// A bounded, one-sided quad.
///
/// Corners go around the quad: upper-left, upper-right, lower-right,
/// lower-left. The normal is `(up_right - up_left) x (low_left - up_left)`,
/// normalized; signed distances are positive on that side. Only particles
/// moving against the normal collide, and only when their projection lands
/// on the quad (plus a small margin), never on the infinite plane.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane<F: Float> {
    corners: [Vec3<F>; 4],
    normal: Vec3<F>,
    pub threshold: F,
    pub margin: F,
    pub friction: F,
}

impl<F: Float> Plane<F> {
    pub fn new(up_left: Vec3<F>, up_right: Vec3<F>, low_right: Vec3<F>, low_left: Vec3<F>) -> Self {
        let normal = (up_right - up_left).cross(low_left - up_left).normalize();
        Plane {
            corners: [up_left, up_right, low_right, low_left],
            normal,
            threshold: F::from_f32(PLANE_THRESHOLD),
            margin: F::from_f32(PLANE_MARGIN),
            friction: F::from_f32(PLANE_FRICTION),
        }
    }

    /// Quad spanned from one corner by two edge vectors.
    pub fn from_edges(up_left: Vec3<F>, to_right: Vec3<F>, to_low: Vec3<F>) -> Self {
        Plane::new(up_left, up_left + to_right, up_left + to_right + to_low, up_left + to_low)
    }

    /// Horizontal square floor at height `y`, facing up, spanning
    /// `[-half_extent, half_extent]` in x and z.
    pub fn floor(y: F, half_extent: F) -> Self {
        let h = half_extent;
        Plane::new(
            Vec3::new(-h, y, h),
            Vec3::new(h, y, h),
            Vec3::new(h, y, -h),
            Vec3::new(-h, y, -h),
        )
    }

    /// The same quad facing the other way.
    pub fn flipped(&self) -> Self {
        let [ul, ur, lr, ll] = self.corners;
        Plane { corners: [ur, ul, ll, lr], normal: -self.normal, ..self.clone() }
    }

    pub fn corners(&self) -> [Vec3<F>; 4] {
        self.corners
    }

    /// Unit normal; zero for a degenerate quad.
    pub fn normal(&self) -> Vec3<F> {
        self.normal
    }

    pub fn translate(&mut self, offset: Vec3<F>) {
        for c in self.corners.iter_mut() {
            *c = *c + offset;
        }
    }

    /// Signed distance from `point` to the plane through the quad.
    pub fn signed_distance(&self, point: Vec3<F>) -> F {
        (point - self.corners[0]).dot(self.normal)
    }

    /// Whether the orthogonal projection of `point` lies on the quad,
    /// widened by `margin` of each edge length.
    pub fn contains_projection(&self, point: Vec3<F>) -> bool {
        let projected = point - self.normal.scale(self.signed_distance(point));
        let rel = projected - self.corners[0];
        let e1 = self.corners[1] - self.corners[0];
        let e2 = self.corners[3] - self.corners[0];
        let (l1, l2) = (e1.length_sq(), e2.length_sq());
        if l1.is_near_zero(F::from_f32(1e-12)) || l2.is_near_zero(F::from_f32(1e-12)) {
            return false;
        }
        let u = rel.dot(e1) / l1;
        let w = rel.dot(e2) / l2;
        let lo = -self.margin;
        let hi = F::one() + self.margin;
        u >= lo && u <= hi && w >= lo && w <= hi
    }

    fn collide(&self, particle: &mut Particle<F>, dt: F) -> bool {
        if self.normal.length_sq().is_near_zero(F::from_f32(1e-12)) {
            return false;
        }
        let dist = self.signed_distance(particle.pos);
        if dist >= self.threshold {
            return false;
        }
        let v = particle.velocity;
        let approach = v.dot(self.normal);
        if !(approach < F::zero()) {
            return false;
        }
        // Only particles that reached the far side during the last step;
        // anything deeper was already behind the plane.
        if dist < -(v.length() * dt + self.threshold) {
            return false;
        }
        if !self.contains_projection(particle.pos) {
            return false;
        }

        let normal_part = self.normal.scale(approach);
        let tangential = v - normal_part;
        let velocity = tangential - normal_part.scale(self.friction);

        // Back along the velocity to the surface, but never further than the
        // particle travelled in the last step. Grazing contacts would need
        // an arbitrarily long walk; those drop straight onto the plane.
        let back = dist / approach;
        let speed = v.length();
        let surface = if speed * back.abs() <= speed * dt + self.threshold {
            particle.pos - v.scale(back)
        } else {
            particle.pos - self.normal.scale(dist)
        };
        particle.settle(surface, velocity, dt);
        true
    }
}
