//! Mass-spring cloth simulation.
//!
//! `weft` models cloth as a rectangular grid of point masses joined by
//! stretch, shear and bend springs, advanced under gravity and wind and
//! pushed out of simple obstacles. It is the simulation core only: it hands
//! positions, normals and spring segments to a renderer and takes timesteps
//! and forces from a driver.
//!
//! # Features
//!
//! - **Topology**: `W x H` grids from four corners, explicit or density-based
//!   resolution, boundary-aware spring wiring
//! - **Two integrators**: semi-implicit Euler and (time-corrected) Verlet
//! - **Two spring models**: Hooke forces with optional tolerance clamping, or
//!   direct position relaxation
//! - **Collision**: spheres and bounded, one-sided quads
//! - **Aerodynamics**: per-triangle wind loading along surface normals
//! - **Observable**: Monitor physics steps via the `StepObserver` trait
//! - **`no_std` compatible**: needs only `alloc`
//!
//! ```
//! use weft::{Cloth, ClothConfig, Corners, NoOpStepObserver, Shape, Sphere, Vec3};
//!
//! let config = ClothConfig::new().with_gravity(Vec3::new(0.0, -9.81, 0.0));
//! let mut cloth: Cloth<f32> = Cloth::new(10, 10, Corners::unit_square(), config).unwrap();
//! cloth.set_fixed_corners(true, true, false, false);
//!
//! let shapes = [Shape::from(Sphere::new(Vec3::new(0.0, -1.0, 0.3), 0.4))];
//! for _ in 0..60 {
//!     cloth.step(1.0 / 60.0, &mut NoOpStepObserver);
//!     cloth.resolve_collisions(&shapes);
//! }
//! cloth.recompute_normals();
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod spring;
pub mod constraint;
pub mod integrator;
pub mod collision;
pub mod grid;
pub mod cloth;
pub mod scene;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use particle::{GridCoord, Particle};
pub use spring::{Spring, SpringKind};
pub use integrator::Integrator;
pub use collision::{Plane, Shape, Sphere};
pub use grid::{ClothLayout, Corners, GridMetrics, Resolution};
pub use cloth::Cloth;
pub use scene::Scene;
pub use config::{ClothConfig, MassModel, SpringMode};
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::ClothError;
