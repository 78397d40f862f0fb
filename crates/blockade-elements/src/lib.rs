//! # Blockade Elements
//!
//! Per-element data for the Blockade framework. Each atom of an analyte
//! occupies a sphere whose radius is looked up here; atomic masses are used
//! to place the analyte's centre of mass.
//!
//! ## Modules
//!
//! - [`table`]: Static van der Waals radii (Bondi 1964 and later
//!   literature) and standard atomic weights for ~100 elements.
//! - [`provider`]: The [`RadiusProvider`](provider::RadiusProvider) trait
//!   and its two implementations (element-specific and uniform).
//! - [`resolver`]: Identity normalisation, alias handling for
//!   biomolecular naming conventions, and bulk assignment with a
//!   [`RadiusReport`](resolver::RadiusReport).
//!
//! Resolution never fails: identities that cannot be matched fall back to a
//! configured default radius and are listed in the report.

pub mod provider;
pub mod resolver;
pub mod table;

pub use provider::{RadiusProvider, UniformRadius, VanDerWaalsRadii};
pub use resolver::{assign_radii, AtomIdentity, RadiusReport, Resolution};
