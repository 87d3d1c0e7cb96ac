//! Cloth topology: particle grid layout and stretch/shear/bend wiring.

use crate::config::ClothConfig;
use crate::error::ClothError;
use crate::float::Float;
use crate::particle::{GridCoord, Particle};
use crate::spring::{Spring, SpringKind};
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// The four corners of a cloth, going around it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Corners<F: Float> {
    pub up_left: Vec3<F>,
    pub up_right: Vec3<F>,
    pub low_right: Vec3<F>,
    pub low_left: Vec3<F>,
}

impl<F: Float> Corners<F> {
    pub fn new(up_left: Vec3<F>, up_right: Vec3<F>, low_right: Vec3<F>, low_left: Vec3<F>) -> Self {
        Corners { up_left, up_right, low_right, low_left }
    }

    /// Flat 1x1 sheet hanging in the xy-plane, top edge at y = 0.5.
    pub fn unit_square() -> Self {
        Corners::new(
            Vec3::from_f32(-0.5, 0.5, 0.0),
            Vec3::from_f32(0.5, 0.5, 0.0),
            Vec3::from_f32(0.5, -0.5, 0.0),
            Vec3::from_f32(-0.5, -0.5, 0.0),
        )
    }

    /// Edge from upper-left to upper-right; columns advance along it.
    pub fn horizontal(&self) -> Vec3<F> {
        self.up_right - self.up_left
    }

    /// Edge from upper-left to lower-left; rows advance along it.
    pub fn vertical(&self) -> Vec3<F> {
        self.low_left - self.up_left
    }

    fn validate(&self) -> Result<(), ClothError> {
        let finite = [self.up_left, self.up_right, self.low_right, self.low_left]
            .iter()
            .all(|c| c.is_finite());
        let eps = F::from_f32(1e-8);
        let h = self.horizontal();
        let v = self.vertical();
        if !finite
            || h.length_sq().is_near_zero(eps)
            || v.length_sq().is_near_zero(eps)
            || h.cross(v).length_sq().is_near_zero(eps)
        {
            return Err(ClothError::DegenerateCorners);
        }
        Ok(())
    }
}

impl<F: Float> Default for Corners<F> {
    fn default() -> Self {
        Corners::unit_square()
    }
}

/// How many particles the grid has along each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Exact particle counts.
    Explicit { width: usize, height: usize },
    /// Particle count along the shorter edge; the longer edge gets as many
    /// as keep the cells roughly square.
    Density(usize),
}

impl Resolution {
    /// Particle counts `(width, height)` for a cloth spanning `corners`.
    pub fn resolve<F: Float>(&self, corners: &Corners<F>) -> Result<(usize, usize), ClothError> {
        corners.validate()?;
        let (width, height) = match *self {
            Resolution::Explicit { width, height } => (width, height),
            Resolution::Density(density) => {
                if density < 2 {
                    return Err(ClothError::InvalidDensity(density));
                }
                let horiz = corners.horizontal().length();
                let vert = corners.vertical().length();
                let d = F::from_usize(density);
                if horiz <= vert {
                    (density, (d * vert / horiz).round().to_usize())
                } else {
                    ((d * horiz / vert).round().to_usize(), density)
                }
            }
        };
        if width < 2 || height < 2 {
            return Err(ClothError::InvalidGridDimensions { width, height });
        }
        Ok((width, height))
    }
}

/// Everything a scene description provides to build a cloth: resolution,
/// corners, and which corners are pinned (upper-left, upper-right,
/// lower-right, lower-left).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClothLayout<F: Float> {
    pub resolution: Resolution,
    pub corners: Corners<F>,
    pub pinned: [bool; 4],
}

impl<F: Float> ClothLayout<F> {
    pub fn new(resolution: Resolution, corners: Corners<F>) -> Self {
        ClothLayout { resolution, corners, pinned: [false; 4] }
    }

    pub fn with_pinned(mut self, pinned: [bool; 4]) -> Self {
        self.pinned = pinned;
        self
    }
}

impl<F: Float> Default for ClothLayout<F> {
    /// 10x10 unit square with the top two corners pinned.
    fn default() -> Self {
        ClothLayout::new(Resolution::Explicit { width: 10, height: 10 }, Corners::unit_square())
            .with_pinned([true, true, false, false])
    }
}

/// Nominal spacing of a grid, before any particle moves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridMetrics<F: Float> {
    /// Offset between horizontally adjacent particles.
    pub col_step: Vec3<F>,
    /// Offset between vertically adjacent particles.
    pub row_step: Vec3<F>,
    /// Rest length of horizontal stretch springs.
    pub stretch_rest: F,
    /// Rest length of vertical stretch springs.
    pub stretch_rest_vertical: F,
    /// `stretch_rest * sqrt(2)`; exact for square cells.
    pub shear_rest: F,
    /// `2 * stretch_rest`.
    pub bend_rest: F,
}

impl<F: Float> GridMetrics<F> {
    pub fn new(width: usize, height: usize, corners: &Corners<F>) -> Self {
        let col_step = corners.horizontal().scale(F::one() / F::from_usize(width - 1));
        let row_step = corners.vertical().scale(F::one() / F::from_usize(height - 1));
        let stretch_rest = col_step.length();
        GridMetrics {
            col_step,
            row_step,
            stretch_rest,
            stretch_rest_vertical: row_step.length(),
            shear_rest: stretch_rest * F::two().sqrt(),
            bend_rest: stretch_rest * F::two(),
        }
    }

    /// Rest position of the particle at `(col, row)`.
    pub fn position(&self, origin: Vec3<F>, col: usize, row: usize) -> Vec3<F> {
        origin + self.row_step.scale(F::from_usize(row)) + self.col_step.scale(F::from_usize(col))
    }
}

/// Particles and springs of a freshly built cloth.
pub(crate) struct Topology<F: Float> {
    pub width: usize,
    pub height: usize,
    pub metrics: GridMetrics<F>,
    pub particles: AllocVec<Particle<F>>,
    pub springs: [AllocVec<Spring<F>>; 3],
}

impl<F: Float> Topology<F> {
    /// Lay out a `width` x `height` grid across `corners` and wire it.
    ///
    /// Particle at (col, row) has index `row * width + col`.
    ///
    /// Each particle only connects rightward and downward, so every
    /// unordered pair is wired once and no partner falls outside the grid:
    /// - Stretch: (c+1, r) and (c, r+1)
    /// - Shear: (c+1, r+1) and (c-1, r+1)
    /// - Bend: (c+2, r) and (c, r+2)
    ///
    /// Rest lengths are measured from the laid-out positions, so skewed
    /// cells get the right lengths too.
    pub fn build(
        width: usize,
        height: usize,
        corners: &Corners<F>,
        config: &ClothConfig<F>,
    ) -> Result<Self, ClothError> {
        if width < 2 || height < 2 {
            return Err(ClothError::InvalidGridDimensions { width, height });
        }
        corners.validate()?;

        let mass = config.mass.particle_mass(width * height);
        if !(mass > F::zero()) || !mass.is_finite() {
            return Err(ClothError::InvalidMass);
        }

        let metrics = GridMetrics::new(width, height, corners);
        let mut particles = AllocVec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let pos = metrics.position(corners.up_left, col, row);
                particles.push(Particle::new(pos, mass, GridCoord::new(col, row)));
            }
        }

        let mut springs: [AllocVec<Spring<F>>; 3] = [AllocVec::new(), AllocVec::new(), AllocVec::new()];
        let tolerance = config.spring_tolerance();
        let index = |col: usize, row: usize| row * width + col;

        for row in 0..height {
            for col in 0..width {
                let here = index(col, row);
                let mut links: [Option<(usize, SpringKind)>; 6] = [None; 6];
                if col + 1 < width {
                    links[0] = Some((index(col + 1, row), SpringKind::Stretch));
                }
                if col + 2 < width {
                    links[1] = Some((index(col + 2, row), SpringKind::Bend));
                }
                if row + 1 < height {
                    links[2] = Some((index(col, row + 1), SpringKind::Stretch));
                    if col + 1 < width {
                        links[3] = Some((index(col + 1, row + 1), SpringKind::Shear));
                    }
                    if col >= 1 {
                        links[4] = Some((index(col - 1, row + 1), SpringKind::Shear));
                    }
                }
                if row + 2 < height {
                    links[5] = Some((index(col, row + 2), SpringKind::Bend));
                }

                for (other, kind) in links.iter().flatten() {
                    let spring = Spring::between(
                        here,
                        *other,
                        &particles,
                        *kind,
                        config.kind_stiffness(*kind),
                        tolerance,
                    )
                    .ok_or(ClothError::DegenerateCorners)?;
                    springs[kind.slot()].push(spring);
                }
            }
        }

        log::debug!(
            "built {}x{} cloth: {} stretch, {} shear, {} bend springs",
            width,
            height,
            springs[0].len(),
            springs[1].len(),
            springs[2].len(),
        );

        Ok(Topology { width, height, metrics, particles, springs })
    }
}
