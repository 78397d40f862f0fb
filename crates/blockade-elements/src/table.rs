//! Tabulated element data.
//!
//! Van der Waals radii from A. Bondi, *J. Phys. Chem.* **68**, 441 (1964),
//! extended with later literature values for the heavier elements. Masses
//! are IUPAC standard atomic weights (mass number of the longest-lived
//! isotope for elements without a stable one).
//!
//! Data is embedded at compile time.

/// Radius and mass for a single element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementData {
    /// Upper-case element symbol (e.g. `"C"`, `"FE"`).
    pub symbol: &'static str,
    /// Van der Waals radius (Å).
    pub vdw_radius: f64,
    /// Standard atomic weight (u).
    pub mass: f64,
}

const fn el(symbol: &'static str, vdw_radius: f64, mass: f64) -> ElementData {
    ElementData {
        symbol,
        vdw_radius,
        mass,
    }
}

/// All tabulated elements, ordered by atomic number.
pub static ELEMENTS: &[ElementData] = &[
    // --- Period 1 ---
    el("H", 1.20, 1.008),
    el("HE", 1.40, 4.0026),
    // --- Period 2 ---
    el("LI", 1.82, 6.94),
    el("BE", 1.53, 9.0122),
    el("B", 1.92, 10.81),
    el("C", 1.70, 12.011),
    el("N", 1.55, 14.007),
    el("O", 1.52, 15.999),
    el("F", 1.47, 18.998),
    el("NE", 1.54, 20.180),
    // --- Period 3 ---
    el("NA", 2.27, 22.990),
    el("MG", 1.73, 24.305),
    el("AL", 1.84, 26.982),
    el("SI", 2.10, 28.085),
    el("P", 1.80, 30.974),
    el("S", 1.80, 32.06),
    el("CL", 1.75, 35.45),
    el("AR", 1.88, 39.948),
    // --- Period 4 ---
    el("K", 2.75, 39.098),
    el("CA", 2.31, 40.078),
    el("SC", 2.11, 44.956),
    el("TI", 1.87, 47.867),
    el("V", 1.79, 50.942),
    el("CR", 1.89, 51.996),
    el("MN", 1.97, 54.938),
    el("FE", 1.94, 55.845),
    el("CO", 1.92, 58.933),
    el("NI", 1.84, 58.693),
    el("CU", 1.32, 63.546),
    el("ZN", 1.22, 65.38),
    el("GA", 1.87, 69.723),
    el("GE", 2.11, 72.630),
    el("AS", 1.85, 74.922),
    el("SE", 1.90, 78.971),
    el("BR", 1.85, 79.904),
    el("KR", 2.02, 83.798),
    // --- Period 5 ---
    el("RB", 3.03, 85.468),
    el("SR", 2.49, 87.62),
    el("Y", 2.32, 88.906),
    el("ZR", 2.23, 91.224),
    el("NB", 2.18, 92.906),
    el("MO", 2.17, 95.95),
    el("TC", 2.16, 98.0),
    el("RU", 2.13, 101.07),
    el("RH", 2.10, 102.91),
    el("PD", 2.10, 106.42),
    el("AG", 1.72, 107.87),
    el("CD", 1.58, 112.41),
    el("IN", 1.93, 114.82),
    el("SN", 2.17, 118.71),
    el("SB", 2.06, 121.76),
    el("TE", 2.06, 127.60),
    el("I", 1.98, 126.90),
    el("XE", 2.16, 131.29),
    // --- Period 6 ---
    el("CS", 3.43, 132.91),
    el("BA", 2.68, 137.33),
    el("LA", 2.43, 138.91),
    el("CE", 2.42, 140.12),
    el("PR", 2.40, 140.91),
    el("ND", 2.39, 144.24),
    el("PM", 2.38, 145.0),
    el("SM", 2.36, 150.36),
    el("EU", 2.35, 151.96),
    el("GD", 2.34, 157.25),
    el("TB", 2.33, 158.93),
    el("DY", 2.31, 162.50),
    el("HO", 2.30, 164.93),
    el("ER", 2.29, 167.26),
    el("TM", 2.27, 168.93),
    el("YB", 2.26, 173.05),
    el("LU", 2.24, 174.97),
    el("HF", 2.23, 178.49),
    el("TA", 2.22, 180.95),
    el("W", 2.18, 183.84),
    el("RE", 2.16, 186.21),
    el("OS", 2.16, 190.23),
    el("IR", 2.13, 192.22),
    el("PT", 2.13, 195.08),
    el("AU", 1.66, 196.97),
    el("HG", 1.55, 200.59),
    el("TL", 1.96, 204.38),
    el("PB", 2.02, 207.2),
    el("BI", 2.07, 208.98),
    el("PO", 1.97, 209.0),
    el("AT", 2.02, 210.0),
    el("RN", 2.20, 222.0),
    // --- Period 7 ---
    el("FR", 3.48, 223.0),
    el("RA", 2.83, 226.0),
    el("AC", 2.47, 227.0),
    el("TH", 2.45, 232.04),
    el("PA", 2.43, 231.04),
    el("U", 2.41, 238.03),
    el("NP", 2.39, 237.0),
    el("PU", 2.43, 244.0),
    el("AM", 2.44, 243.0),
    el("CM", 2.45, 247.0),
    el("BK", 2.44, 247.0),
    el("CF", 2.45, 251.0),
    el("ES", 2.45, 252.0),
    el("FM", 2.45, 257.0),
    el("MD", 2.46, 258.0),
    el("NO", 2.46, 259.0),
    el("LR", 2.46, 266.0),
];

/// Look up an element by its upper-case symbol.
pub fn lookup(symbol: &str) -> Option<&'static ElementData> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Standard atomic weight for an upper-case symbol, if tabulated.
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    lookup(symbol).map(|e| e.mass)
}
