//! Element resolution for atom records.
//!
//! Structure files identify atoms in different ways: an explicit element
//! column, an atom name such as `CA` or `HB2`, or a force-field type. This
//! module maps each of these onto a tabulated element key and keeps a
//! report of what was resolved.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::provider::RadiusProvider;
use crate::table;

/// Key recorded for atoms with no identity at all.
pub const UNKNOWN_KEY: &str = "UNKNOWN";

/// Ion and residue-atom spellings mapped onto element symbols.
const ALIASES: &[(&str, &str)] = &[
    ("CA+", "CA"),
    ("MG+", "MG"),
    ("NA+", "NA"),
    ("K+", "K"),
    ("CL-", "CL"),
    ("SO4", "S"),
    ("PO4", "P"),
    ("HA", "H"),
    ("HB", "H"),
    ("HG", "H"),
    ("HD", "H"),
    ("HE", "H"),
    ("HZ", "H"),
    ("HH", "H"),
    ("HN", "H"),
    ("H1", "H"),
    ("H2", "H"),
    ("H3", "H"),
    ("OG", "O"),
    ("OD", "O"),
    ("OE", "O"),
    ("OH", "O"),
    ("NE", "N"),
    ("NH", "N"),
    ("NZ", "N"),
    ("ND", "N"),
    ("SG", "S"),
    ("SD", "S"),
];

/// Leading letters that identify biomolecular atom names.
const BIOMOLECULAR_PREFIXES: &[char] = &['H', 'C', 'N', 'O', 'S', 'P'];

/// How an atom is identified in its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomIdentity<'a> {
    /// Explicit element symbol.
    Symbol(&'a str),
    /// Atom name (PDB columns 13-16, PQR atom name).
    Name(&'a str),
    /// Force-field atom type.
    Type(&'a str),
    /// Nothing usable.
    Missing,
}

impl<'a> AtomIdentity<'a> {
    /// Choose the most specific non-blank field: element, then name, then type.
    pub fn from_fields(
        element: Option<&'a str>,
        name: Option<&'a str>,
        atom_type: Option<&'a str>,
    ) -> Self {
        let usable = |s: Option<&'a str>| s.filter(|v| !v.trim().is_empty());
        if let Some(e) = usable(element) {
            AtomIdentity::Symbol(e)
        } else if let Some(n) = usable(name) {
            AtomIdentity::Name(n)
        } else if let Some(t) = usable(atom_type) {
            AtomIdentity::Type(t)
        } else {
            AtomIdentity::Missing
        }
    }
}

/// Outcome of resolving one atom.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Element key (tabulated symbol, or the unmatched normalised input).
    pub key: String,
    /// Radius assigned (Å).
    pub radius: f64,
    /// Atomic mass if the key is tabulated.
    pub mass: Option<f64>,
    /// Whether the key matched the element table.
    pub known: bool,
}

/// Upper-case and trim a raw identifier.
pub fn normalise(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn alias(name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
}

fn is_tabulated(symbol: &str) -> bool {
    table::lookup(symbol).is_some()
}

/// First letter, or the first two letters when one letter is not an element.
fn leading_letters(name: &str) -> String {
    let one: String = name.chars().take(1).collect();
    if is_tabulated(&one) || name.chars().count() < 2 {
        one
    } else {
        name.chars().take(2).collect()
    }
}

fn symbol_key(symbol: &str) -> String {
    if is_tabulated(symbol) {
        return symbol.to_string();
    }
    if let Some(mapped) = alias(symbol) {
        return mapped.to_string();
    }
    let guess = leading_letters(symbol);
    if is_tabulated(&guess) {
        guess
    } else {
        symbol.to_string()
    }
}

fn name_key(name: &str) -> String {
    if let Some(mapped) = alias(name) {
        return mapped.to_string();
    }
    match name.chars().next() {
        Some(c) if BIOMOLECULAR_PREFIXES.contains(&c) => c.to_string(),
        _ => leading_letters(name),
    }
}

fn type_key(atom_type: &str) -> String {
    if let Some(mapped) = alias(atom_type) {
        return mapped.to_string();
    }
    if atom_type.starts_with('H') {
        return "H".to_string();
    }
    leading_letters(atom_type)
}

/// Map an identity onto an element key.
///
/// The key is a tabulated symbol when resolution succeeds, otherwise the
/// normalised input (or [`UNKNOWN_KEY`] for a blank identity). Atom names
/// are matched by biomolecular convention before any exact lookup, so the
/// name `CA` is an alpha carbon rather than calcium.
pub fn element_key(identity: &AtomIdentity<'_>) -> String {
    let (raw, resolve): (&str, fn(&str) -> String) = match *identity {
        AtomIdentity::Symbol(s) => (s, symbol_key as fn(&str) -> String),
        AtomIdentity::Name(n) => (n, name_key),
        AtomIdentity::Type(t) => (t, type_key),
        AtomIdentity::Missing => return UNKNOWN_KEY.to_string(),
    };
    let norm = normalise(raw);
    if norm.is_empty() {
        UNKNOWN_KEY.to_string()
    } else {
        resolve(&norm)
    }
}

/// Per-key tally in a [`RadiusReport`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementCount {
    pub count: usize,
    pub radius: f64,
    pub tabulated: bool,
}

/// Summary of a radius assignment pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RadiusReport {
    /// Provider that produced the radii.
    pub provider: String,
    /// Atom count and applied radius per element key.
    pub elements: BTreeMap<String, ElementCount>,
    /// Keys that fell back to the provider default.
    pub unresolved: BTreeSet<String>,
}

impl RadiusReport {
    fn record(&mut self, res: &Resolution) {
        self.elements
            .entry(res.key.clone())
            .and_modify(|e| e.count += 1)
            .or_insert(ElementCount {
                count: 1,
                radius: res.radius,
                tabulated: res.known,
            });
        if !res.known {
            self.unresolved.insert(res.key.clone());
        }
    }

    /// Total atoms recorded.
    pub fn total_atoms(&self) -> usize {
        self.elements.values().map(|e| e.count).sum()
    }

    /// Atoms whose key was not tabulated.
    pub fn unresolved_atoms(&self) -> usize {
        self.unresolved
            .iter()
            .filter_map(|k| self.elements.get(k))
            .map(|e| e.count)
            .sum()
    }
}

/// Resolve every identity with `provider`, returning per-atom results in
/// input order and the aggregate report.
pub fn assign_radii<'a, P, I>(provider: &P, identities: I) -> (Vec<Resolution>, RadiusReport)
where
    P: RadiusProvider + ?Sized,
    I: IntoIterator<Item = AtomIdentity<'a>>,
{
    let mut report = RadiusReport {
        provider: provider.name().to_string(),
        ..Default::default()
    };
    let resolutions: Vec<Resolution> = identities
        .into_iter()
        .map(|id| {
            let res = provider.resolve(&id);
            report.record(&res);
            res
        })
        .collect();
    (resolutions, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::VanDerWaalsRadii;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_name_ca_is_carbon() {
        assert_eq!(element_key(&AtomIdentity::Name("CA")), "C");
        assert_eq!(element_key(&AtomIdentity::Symbol("CA")), "CA");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(element_key(&AtomIdentity::Symbol("cl-")), "CL");
        assert_eq!(element_key(&AtomIdentity::Name("PO4")), "P");
        assert_eq!(element_key(&AtomIdentity::Name("OG")), "O");
        assert_eq!(element_key(&AtomIdentity::Type("NZ")), "N");
    }

    #[test]
    fn test_name_prefix_and_fallback() {
        assert_eq!(element_key(&AtomIdentity::Name("HB2")), "H");
        assert_eq!(element_key(&AtomIdentity::Name("SG")), "S");
        assert_eq!(element_key(&AtomIdentity::Name("MG")), "MG");
        assert_eq!(element_key(&AtomIdentity::Name("ZN1")), "ZN");
    }

    #[test]
    fn test_symbol_heuristic() {
        // "C1" is not a symbol but starts with one.
        assert_eq!(element_key(&AtomIdentity::Symbol("C1")), "C");
        assert_eq!(element_key(&AtomIdentity::Symbol("MG2")), "MG");
        assert_eq!(element_key(&AtomIdentity::Symbol("XX")), "XX");
    }

    #[test]
    fn test_missing_identity() {
        assert_eq!(element_key(&AtomIdentity::Missing), UNKNOWN_KEY);
        assert_eq!(element_key(&AtomIdentity::Symbol("   ")), UNKNOWN_KEY);
        assert_eq!(
            AtomIdentity::from_fields(Some(" "), None, Some("OW")),
            AtomIdentity::Type("OW")
        );
        assert_eq!(
            AtomIdentity::from_fields(None, None, None),
            AtomIdentity::Missing
        );
    }

    #[test]
    fn test_report_counts() {
        let vdw = VanDerWaalsRadii::new(1.5).unwrap();
        let ids = vec![
            AtomIdentity::Symbol("C"),
            AtomIdentity::Symbol("c"),
            AtomIdentity::Symbol("O"),
            AtomIdentity::Symbol("XX"),
            AtomIdentity::Missing,
        ];
        let (res, report) = assign_radii(&vdw, ids);

        assert_eq!(res.len(), 5);
        assert_relative_eq!(res[3].radius, 1.5);
        assert_eq!(report.total_atoms(), 5);
        assert_eq!(report.elements["C"].count, 2);
        assert_eq!(report.unresolved_atoms(), 2);
        assert!(report.unresolved.contains("XX"));
        assert!(report.unresolved.contains(UNKNOWN_KEY));
    }

    proptest! {
        #[test]
        fn prop_radius_always_positive(raw in "\\PC{0,6}") {
            let vdw = VanDerWaalsRadii::new(1.5).unwrap();
            for id in [AtomIdentity::Symbol(&raw), AtomIdentity::Name(&raw), AtomIdentity::Type(&raw)] {
                let res = vdw.resolve(&id);
                prop_assert!(res.radius > 0.0);
                prop_assert_eq!(res.known, table::lookup(&res.key).is_some());
            }
        }
    }
}
