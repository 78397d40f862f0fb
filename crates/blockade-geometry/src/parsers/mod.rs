//! File format parsers for importing analyte structures.
//!
//! Supported formats:
//! - [`.pdb` / `.ent`](pdb): Protein Data Bank fixed-column records
//! - [`.pqr`](pqr): PDB variant carrying per-atom charge and radius
//! - [`.xyz`](xyz): XYZ molecular coordinate files
//!
//! All coordinates are returned in angstroms.

pub mod pdb;
pub mod pqr;
pub mod xyz;

use std::path::Path;

use thiserror::Error;

/// Errors during structure file parsing.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    FormatError { line: usize, message: String },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No atoms found in structure")]
    Empty,
}

/// One atom as read from a structure file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAtom {
    /// Position (Å).
    pub position: [f64; 3],
    /// Explicit element symbol, if the format carries one.
    pub element: Option<String>,
    /// Atom name (e.g. `CA`, `HB2`).
    pub name: Option<String>,
    /// Force-field atom type.
    pub atom_type: Option<String>,
    /// Radius supplied by the file (PQR), in Å.
    pub radius: Option<f64>,
}

/// Structure formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Pqr,
    Xyz,
}

impl StructureFormat {
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdb" | "ent" => Ok(StructureFormat::Pdb),
            "pqr" => Ok(StructureFormat::Pqr),
            "xyz" => Ok(StructureFormat::Xyz),
            _ => Err(ParseError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse structure text in the given format. An empty result is an error.
pub fn parse_structure(content: &str, format: StructureFormat) -> Result<Vec<ParsedAtom>, ParseError> {
    let atoms = match format {
        StructureFormat::Pdb => pdb::parse_pdb(content)?,
        StructureFormat::Pqr => pqr::parse_pqr(content)?,
        StructureFormat::Xyz => xyz::parse_xyz(content)?,
    };
    if atoms.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(atoms)
}

/// Read and parse a structure file, choosing the parser by extension.
pub fn load_structure(path: impl AsRef<Path>) -> Result<Vec<ParsedAtom>, ParseError> {
    let path = path.as_ref();
    let format = StructureFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let atoms = parse_structure(&content, format)?;
    log::debug!("Read {} atoms from {}", atoms.len(), path.display());
    Ok(atoms)
}

pub(crate) fn parse_coord(raw: &str, axis: char, line: usize) -> Result<f64, ParseError> {
    raw.trim().parse().map_err(|_| ParseError::FormatError {
        line,
        message: format!("Invalid {} coordinate: '{}'", axis, raw.trim()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(StructureFormat::from_path(Path::new("a.PDB")).unwrap(), StructureFormat::Pdb);
        assert_eq!(StructureFormat::from_path(Path::new("a.ent")).unwrap(), StructureFormat::Pdb);
        assert_eq!(StructureFormat::from_path(Path::new("x/y.pqr")).unwrap(), StructureFormat::Pqr);
        assert!(matches!(
            StructureFormat::from_path(Path::new("mesh.obj")),
            Err(ParseError::UnsupportedFormat(_))
        ));
        assert!(StructureFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_empty_structure_rejected() {
        let result = parse_structure("REMARK nothing here\nEND\n", StructureFormat::Pdb);
        assert!(matches!(result, Err(ParseError::Empty)));
    }

    #[test]
    fn test_missing_file() {
        let result = load_structure("/nonexistent/analyte.pdb");
        assert!(matches!(result, Err(ParseError::Io(_))));
    }
}
