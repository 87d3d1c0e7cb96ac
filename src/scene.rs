//! A cloth together with the obstacles it falls onto.

use crate::cloth::Cloth;
use crate::collision::{Plane, Shape};
use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::float::Float;
use crate::grid::ClothLayout;
use crate::observer::StepObserver;
use alloc::vec::Vec as AllocVec;

/// How far below the cloth's lowest corner the floor sits.
const FLOOR_DROP: f32 = 1.0;
/// Floor half-extent as a multiple of the cloth's longest edge.
const FLOOR_SPAN: f32 = 10.0;

/// Owns one cloth, the layout it was built from, and the shapes it
/// collides with. Drives the full per-frame pipeline: step, collide,
/// recompute normals.
pub struct Scene<F: Float> {
    layout: ClothLayout<F>,
    cloth: Cloth<F>,
    shapes: AllocVec<Shape<F>>,
    floor: Option<Shape<F>>,
    /// Whether `floor` came from `set_floor_plane` rather than `set_floor`.
    custom_floor: bool,
}

impl<F: Float> Scene<F> {
    pub fn new(layout: ClothLayout<F>, config: ClothConfig<F>) -> Result<Self, ClothError> {
        let cloth = Cloth::from_layout(&layout, config)?;
        Ok(Scene { layout, cloth, shapes: AllocVec::new(), floor: None, custom_floor: false })
    }

    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = Shape<F>>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    pub fn add_shape(&mut self, shape: impl Into<Shape<F>>) {
        self.shapes.push(shape.into());
    }

    pub fn shapes(&self) -> &[Shape<F>] {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut [Shape<F>] {
        &mut self.shapes
    }

    pub fn clear_shapes(&mut self) {
        self.shapes.clear();
    }

    /// Add or remove a wide, upward-facing floor below the cloth.
    pub fn set_floor(&mut self, enabled: bool) {
        self.floor = if enabled { Some(self.default_floor().into()) } else { None };
        self.custom_floor = false;
    }

    /// Use a specific plane as the floor. It stays put across resets.
    pub fn set_floor_plane(&mut self, plane: Plane<F>) {
        self.floor = Some(plane.into());
        self.custom_floor = true;
    }

    pub fn floor(&self) -> Option<&Shape<F>> {
        self.floor.as_ref()
    }

    fn default_floor(&self) -> Plane<F> {
        let c = &self.layout.corners;
        let lowest = [c.up_left, c.up_right, c.low_right, c.low_left]
            .iter()
            .fold(c.up_left.y, |y, p| y.min(p.y));
        let extent = c.horizontal().length().max(c.vertical().length());
        Plane::floor(lowest - F::from_f32(FLOOR_DROP), extent * F::from_f32(FLOOR_SPAN))
    }

    pub fn cloth(&self) -> &Cloth<F> {
        &self.cloth
    }

    pub fn cloth_mut(&mut self) -> &mut Cloth<F> {
        &mut self.cloth
    }

    pub fn layout(&self) -> &ClothLayout<F> {
        &self.layout
    }

    /// One frame: step the cloth, resolve collisions against every shape
    /// and the floor, then refresh normals. Returns the number of contacts.
    pub fn update<O: StepObserver>(&mut self, dt: F, observer: &mut O) -> usize {
        self.cloth.step(dt, observer);
        let contacts = self.update_collisions();
        observer.on_collisions(contacts);
        self.cloth.recompute_normals();
        contacts
    }

    /// Resolve collisions without stepping.
    pub fn update_collisions(&mut self) -> usize {
        let mut contacts = self.cloth.resolve_collisions(&self.shapes);
        if let Some(floor) = &self.floor {
            contacts += self.cloth.resolve_collisions(core::slice::from_ref(floor));
        }
        contacts
    }

    /// Rebuild the cloth from the stored layout, keeping the current
    /// damping, tolerance, stiffness and other runtime settings.
    pub fn reset_cloth(&mut self) -> Result<(), ClothError> {
        let config = self.cloth.config().clone();
        self.cloth = Cloth::from_layout(&self.layout, config)?;
        log::debug!("cloth reset to {}x{}", self.cloth.width(), self.cloth.height());
        Ok(())
    }

    /// Replace the layout and configuration. Shapes are kept. A default
    /// floor is moved under the new cloth; a plane given to
    /// `set_floor_plane` is kept as is.
    pub fn reset(&mut self, layout: ClothLayout<F>, config: ClothConfig<F>) -> Result<(), ClothError> {
        let cloth = Cloth::from_layout(&layout, config)?;
        self.layout = layout;
        self.cloth = cloth;
        if self.floor.is_some() && !self.custom_floor {
            self.set_floor(true);
        }
        log::debug!("scene reset to {}x{}", self.cloth.width(), self.cloth.height());
        Ok(())
    }

    pub fn change_damping(&mut self, damping: F) {
        self.cloth.set_damping(damping);
    }

    pub fn change_tolerance(&mut self, tolerance: F) {
        self.cloth.set_spring_tolerance(tolerance);
    }

    pub fn change_spring_stiffness(&mut self, stiffness: F) {
        self.cloth.set_spring_stiffness(stiffness);
    }
}
