//! Parser for `.pqr` files.
//!
//! PQR records follow PDB naming but are whitespace-delimited, and the
//! occupancy/temperature columns are replaced by charge and radius:
//! ```text
//! ATOM  <serial> <name> <resName> [chain] <resSeq> <x> <y> <z> <charge> <radius>
//! ```
//! The chain identifier is optional, so fields are read from the end of the
//! record. The radius is kept as a file-provided radius (Å).

use super::{parse_coord, ParseError, ParsedAtom};

/// Parse PQR text into atoms.
pub fn parse_pqr(content: &str) -> Result<Vec<ParsedAtom>, ParseError> {
    let mut atoms = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.first().copied() {
            Some("END") | Some("ENDMDL") => break,
            Some("ATOM") | Some("HETATM") => {}
            _ => continue,
        }
        if parts.len() < 10 {
            return Err(ParseError::FormatError {
                line: line_no,
                message: format!(
                    "Expected at least 10 fields in PQR record, got {}",
                    parts.len()
                ),
            });
        }

        let n = parts.len();
        let x = parse_coord(parts[n - 5], 'x', line_no)?;
        let y = parse_coord(parts[n - 4], 'y', line_no)?;
        let z = parse_coord(parts[n - 3], 'z', line_no)?;
        let radius: f64 = parts[n - 1].parse().map_err(|_| ParseError::FormatError {
            line: line_no,
            message: format!("Invalid radius: {}", parts[n - 1]),
        })?;

        atoms.push(ParsedAtom {
            position: [x, y, z],
            element: None,
            name: Some(parts[2].to_string()),
            atom_type: None,
            radius: Some(radius),
        });
    }

    Ok(atoms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_and_without_chain() {
        let content = "\
REMARK generated
ATOM      1  N   MET A   1     -1.000   2.000   3.500 -0.3000 1.8240
ATOM      2  CA  MET     1      0.000   0.000   0.000  0.2100 1.9080
END
ATOM      3  C   MET A   1      9.000   9.000   9.000  0.5973 1.9080
";
        let atoms = parse_pqr(content).unwrap();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[0].position, [-1.0, 2.0, 3.5]);
        assert_eq!(atoms[0].radius, Some(1.824));
        assert_eq!(atoms[1].name.as_deref(), Some("CA"));
        assert!(atoms[1].element.is_none());
    }

    #[test]
    fn test_short_record() {
        let err = parse_pqr("ATOM 1 N MET 1 0.0 0.0 0.0").unwrap_err();
        assert!(matches!(err, ParseError::FormatError { line: 1, .. }));
    }

    #[test]
    fn test_bad_radius() {
        let err = parse_pqr("ATOM 1 N MET A 1 0.0 0.0 0.0 0.1 big").unwrap_err();
        assert!(err.to_string().contains("radius"));
    }
}
