//! Membrane and pore geometry.
//!
//! A pore is described by its local radius as a function of height. The
//! membrane occupies the slab `|z| < half_thickness` outside that radius.
//! [`PoreProfile::is_membrane`] is written once in terms of
//! [`PoreProfile::local_radius`]; each geometry supplies only the profile.

use serde::Serialize;
use thiserror::Error;

/// Errors from constructing pore geometry or simulation boxes.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Membrane thickness must be positive, got {0} Å")]
    InvalidThickness(f64),

    #[error("{name} must be {requirement}, got {value} Å")]
    InvalidRadius {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },

    #[error("Double cone outer radius ({outer} Å) must exceed inner radius ({inner} Å)")]
    ConeOrdering { inner: f64, outer: f64 },

    #[error("Invalid simulation box: {0}")]
    InvalidBox(String),
}

/// Axially symmetric pore through a membrane centred on `z = 0`.
pub trait PoreProfile {
    /// Pore radius at height `z` (Å).
    fn local_radius(&self, z: f64) -> f64;

    /// Half the membrane thickness (Å).
    fn half_thickness(&self) -> f64;

    /// Largest pore radius anywhere in the membrane (Å).
    fn max_radius(&self) -> f64;

    /// Whether `(x, y, z)` lies inside membrane material.
    fn is_membrane(&self, x: f64, y: f64, z: f64) -> bool {
        z.abs() < self.half_thickness() && x.hypot(y) > self.local_radius(z)
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(GeometryError::InvalidRadius {
            name,
            requirement: "positive",
            value,
        })
    }
}

fn half_of(thickness: f64) -> Result<f64, GeometryError> {
    if thickness.is_finite() && thickness > 0.0 {
        Ok(thickness / 2.0)
    } else {
        Err(GeometryError::InvalidThickness(thickness))
    }
}

/// Cylindrical pore, optionally chamfered at both membrane faces.
///
/// With a positive `corner_radius` the radius at each face is
/// `pore_radius + corner_radius`, narrowing linearly to `pore_radius` at
/// `chamfer_depth` inside the face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cylindrical {
    pore_radius: f64,
    corner_radius: f64,
    chamfer_depth: f64,
    half_thickness: f64,
}

impl Cylindrical {
    /// `chamfer_depth` defaults to `corner_radius` (a 45° bevel).
    pub fn new(
        pore_radius: f64,
        membrane_thickness: f64,
        corner_radius: f64,
        chamfer_depth: Option<f64>,
    ) -> Result<Self, GeometryError> {
        let pore_radius = positive("pore_radius", pore_radius)?;
        let half_thickness = half_of(membrane_thickness)?;
        if !corner_radius.is_finite() || corner_radius < 0.0 {
            return Err(GeometryError::InvalidRadius {
                name: "corner_radius",
                requirement: "non-negative",
                value: corner_radius,
            });
        }
        let chamfer_depth = chamfer_depth.unwrap_or(corner_radius);
        if corner_radius > 0.0 && !(chamfer_depth.is_finite() && chamfer_depth > 0.0) {
            return Err(GeometryError::InvalidRadius {
                name: "chamfer_depth",
                requirement: "positive when corner_radius is set",
                value: chamfer_depth,
            });
        }
        Ok(Self {
            pore_radius,
            corner_radius,
            chamfer_depth,
            half_thickness,
        })
    }

    pub fn pore_radius(&self) -> f64 {
        self.pore_radius
    }

    pub fn corner_radius(&self) -> f64 {
        self.corner_radius
    }

    pub fn chamfer_depth(&self) -> f64 {
        self.chamfer_depth
    }

    fn is_chamfered(&self) -> bool {
        self.corner_radius > 0.0
    }
}

impl PoreProfile for Cylindrical {
    fn local_radius(&self, z: f64) -> f64 {
        if !self.is_chamfered() {
            return self.pore_radius;
        }
        let to_face = self.half_thickness - z.abs();
        if to_face >= self.chamfer_depth {
            return self.pore_radius;
        }
        let edge = self.pore_radius + self.corner_radius;
        let progress = (to_face / self.chamfer_depth).clamp(0.0, 1.0);
        edge + (self.pore_radius - edge) * progress
    }

    fn half_thickness(&self) -> f64 {
        self.half_thickness
    }

    fn max_radius(&self) -> f64 {
        self.pore_radius
    }
}

/// Hourglass pore: `inner_radius` at the membrane midplane widening
/// linearly to `outer_radius` at both faces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoubleCone {
    inner_radius: f64,
    outer_radius: f64,
    half_thickness: f64,
}

impl DoubleCone {
    pub fn new(
        inner_radius: f64,
        outer_radius: f64,
        membrane_thickness: f64,
    ) -> Result<Self, GeometryError> {
        let inner_radius = positive("inner_radius", inner_radius)?;
        let half_thickness = half_of(membrane_thickness)?;
        if !outer_radius.is_finite() || outer_radius <= inner_radius {
            return Err(GeometryError::ConeOrdering {
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        Ok(Self {
            inner_radius,
            outer_radius,
            half_thickness,
        })
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }
}

impl PoreProfile for DoubleCone {
    fn local_radius(&self, z: f64) -> f64 {
        let fraction = z.abs() / self.half_thickness;
        self.inner_radius + (self.outer_radius - self.inner_radius) * fraction
    }

    fn half_thickness(&self) -> f64 {
        self.half_thickness
    }

    fn max_radius(&self) -> f64 {
        self.outer_radius
    }
}

/// Either pore geometry, as selected by configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoreSpec {
    Cylindrical(Cylindrical),
    DoubleCone(DoubleCone),
}

impl PoreSpec {
    /// Configuration name of the geometry (`cylindrical` or `double_cone`).
    pub fn pore_type(&self) -> &'static str {
        match self {
            PoreSpec::Cylindrical(_) => "cylindrical",
            PoreSpec::DoubleCone(_) => "double_cone",
        }
    }

    fn profile(&self) -> &dyn PoreProfile {
        match self {
            PoreSpec::Cylindrical(c) => c,
            PoreSpec::DoubleCone(d) => d,
        }
    }
}

impl PoreProfile for PoreSpec {
    fn local_radius(&self, z: f64) -> f64 {
        self.profile().local_radius(z)
    }

    fn half_thickness(&self) -> f64 {
        self.profile().half_thickness()
    }

    fn max_radius(&self) -> f64 {
        self.profile().max_radius()
    }
}

impl From<Cylindrical> for PoreSpec {
    fn from(c: Cylindrical) -> Self {
        PoreSpec::Cylindrical(c)
    }
}

impl From<DoubleCone> for PoreSpec {
    fn from(d: DoubleCone) -> Self {
        PoreSpec::DoubleCone(d)
    }
}
