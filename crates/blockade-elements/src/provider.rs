//! Radius provider trait.
//!
//! Every radius source implements [`RadiusProvider`], which maps an
//! [`AtomIdentity`] to a [`Resolution`]. Providers never fail on unknown
//! input; they substitute their default and mark the resolution as unknown.

use thiserror::Error;

use crate::resolver::{element_key, AtomIdentity, Resolution};
use crate::table;

/// Errors from constructing a radius provider.
#[derive(Debug, Error)]
pub enum RadiusError {
    #[error("Radius must be positive and finite, got {0} Å")]
    InvalidRadius(f64),
}

/// Provides an excluded-volume radius for an atom identity.
pub trait RadiusProvider: Send + Sync {
    /// Human-readable name of this radius source.
    fn name(&self) -> &str;

    /// Resolve an identity to an element key and radius.
    fn resolve(&self, identity: &AtomIdentity<'_>) -> Resolution;

    /// Radius (Å) for an identity.
    fn radius(&self, identity: &AtomIdentity<'_>) -> f64 {
        self.resolve(identity).radius
    }
}

fn check_radius(radius: f64) -> Result<f64, RadiusError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(RadiusError::InvalidRadius(radius))
    }
}

/// Element-specific van der Waals radii with a default for unknown elements.
#[derive(Debug, Clone)]
pub struct VanDerWaalsRadii {
    default_radius: f64,
}

impl VanDerWaalsRadii {
    pub fn new(default_radius: f64) -> Result<Self, RadiusError> {
        Ok(Self {
            default_radius: check_radius(default_radius)?,
        })
    }

    pub fn default_radius(&self) -> f64 {
        self.default_radius
    }
}

impl RadiusProvider for VanDerWaalsRadii {
    fn name(&self) -> &str {
        "van der Waals (element-specific)"
    }

    fn resolve(&self, identity: &AtomIdentity<'_>) -> Resolution {
        let key = element_key(identity);
        match table::lookup(&key) {
            Some(data) => Resolution {
                radius: data.vdw_radius,
                mass: Some(data.mass),
                known: true,
                key,
            },
            None => Resolution {
                radius: self.default_radius,
                mass: None,
                known: false,
                key,
            },
        }
    }
}

/// The same radius for every atom, regardless of element.
///
/// Element keys are still resolved so that masses and the report stay
/// meaningful.
#[derive(Debug, Clone)]
pub struct UniformRadius {
    radius: f64,
}

impl UniformRadius {
    pub fn new(radius: f64) -> Result<Self, RadiusError> {
        Ok(Self {
            radius: check_radius(radius)?,
        })
    }
}

impl RadiusProvider for UniformRadius {
    fn name(&self) -> &str {
        "uniform"
    }

    fn resolve(&self, identity: &AtomIdentity<'_>) -> Resolution {
        let key = element_key(identity);
        let data = table::lookup(&key);
        Resolution {
            radius: self.radius,
            mass: data.map(|d| d.mass),
            known: data.is_some(),
            key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_carbon_symbol_any_case() {
        let vdw = VanDerWaalsRadii::new(1.5).unwrap();
        assert_relative_eq!(vdw.radius(&AtomIdentity::Symbol("c")), 1.70);
        assert_relative_eq!(vdw.radius(&AtomIdentity::Symbol("C")), 1.70);
        assert_relative_eq!(vdw.radius(&AtomIdentity::Symbol(" C ")), 1.70);
    }

    #[test]
    fn test_unknown_symbol_uses_default() {
        let vdw = VanDerWaalsRadii::new(1.9).unwrap();
        let res = vdw.resolve(&AtomIdentity::Symbol("XX"));
        assert!(!res.known);
        assert_eq!(res.key, "XX");
        assert_relative_eq!(res.radius, 1.9);
        assert!(res.mass.is_none());
    }

    #[test]
    fn test_uniform_keeps_mass() {
        let uniform = UniformRadius::new(2.0).unwrap();
        let res = uniform.resolve(&AtomIdentity::Symbol("O"));
        assert_relative_eq!(res.radius, 2.0);
        assert_relative_eq!(res.mass.unwrap(), 15.999);
        assert!(res.known);
    }

    #[test]
    fn test_rejects_non_positive_default() {
        assert!(VanDerWaalsRadii::new(0.0).is_err());
        assert!(UniformRadius::new(-1.0).is_err());
        assert!(UniformRadius::new(f64::NAN).is_err());
    }
}
