//! # Blockade Geometry
//!
//! Geometry handling for the Blockade framework. This crate provides:
//!
//! - **Pore profiles** ([`pore`]): The membrane predicate, written once
//!   against the [`PoreProfile`] trait and implemented for cylindrical
//!   (optionally chamfered) and double-cone pores.
//! - **Simulation boxes** ([`bounds`]): Axis-aligned bounds, either given
//!   explicitly or sized automatically around the pore and the sweep range.
//! - **File parsers** ([`parsers`]): Import analyte structures from `.pdb`,
//!   `.pqr`, and `.xyz` files.
//!
//! All lengths are in angstroms. The membrane is centred on `z = 0` and the
//! pore axis is the z axis.

pub mod bounds;
pub mod parsers;
pub mod pore;

pub use bounds::SimulationBox;
pub use pore::{Cylindrical, DoubleCone, GeometryError, PoreProfile, PoreSpec};
