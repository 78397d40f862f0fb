//! Parser for Protein Data Bank (`.pdb`) files.
//!
//! Only `ATOM` and `HETATM` records are read, using the fixed columns of the
//! PDB format:
//!
//! | Columns | Field |
//! |---------|-------|
//! | 13-16   | atom name |
//! | 31-38   | x (Å) |
//! | 39-46   | y (Å) |
//! | 47-54   | z (Å) |
//! | 77-78   | element symbol (optional) |
//!
//! Reading stops at the first `END` or `ENDMDL`, so multi-model files yield
//! their first model.

use super::{parse_coord, ParseError, ParsedAtom};

/// Slice 1-based inclusive columns `[start, end]`, tolerating short lines.
fn columns(line: &str, start: usize, end: usize) -> Option<&str> {
    let len = line.len();
    if start > len {
        return None;
    }
    line.get(start - 1..end.min(len))
}

fn non_blank(field: Option<&str>) -> Option<String> {
    field
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse PDB text into atoms.
pub fn parse_pdb(content: &str) -> Result<Vec<ParsedAtom>, ParseError> {
    let mut atoms = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let record = line.get(..6).unwrap_or(line).trim_end();
        match record {
            "END" | "ENDMDL" => break,
            "ATOM" | "HETATM" => {}
            _ => continue,
        }

        let coord = |start, end, axis| match columns(line, start, end) {
            Some(raw) => parse_coord(raw, axis, line_no),
            None => Err(ParseError::FormatError {
                line: line_no,
                message: format!("Record too short for {} coordinate", axis),
            }),
        };
        let x = coord(31, 38, 'x')?;
        let y = coord(39, 46, 'y')?;
        let z = coord(47, 54, 'z')?;

        atoms.push(ParsedAtom {
            position: [x, y, z],
            element: non_blank(columns(line, 77, 78)),
            name: non_blank(columns(line, 13, 16)),
            atom_type: None,
            radius: None,
        });
    }

    Ok(atoms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom_line(record: &str, serial: usize, name: &str, xyz: [f64; 3], element: &str) -> String {
        format!(
            "{:<6}{:>5} {:<4} {:>3} {:1}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            record, serial, name, "ALA", "A", 1, xyz[0], xyz[1], xyz[2], 1.0, 0.0, element
        )
    }

    #[test]
    fn test_fixed_columns() {
        let line = atom_line("ATOM", 1, " CA", [11.104, -6.134, 0.5], "C");
        assert_eq!(&line[30..38], "  11.104");
        let atoms = parse_pdb(&line).unwrap();
        assert_eq!(atoms.len(), 1);
        assert_eq!(atoms[0].position, [11.104, -6.134, 0.5]);
        assert_eq!(atoms[0].name.as_deref(), Some("CA"));
        assert_eq!(atoms[0].element.as_deref(), Some("C"));
    }

    #[test]
    fn test_first_model_only() {
        let content = [
            "HEADER    TEST".to_string(),
            "MODEL        1".to_string(),
            atom_line("ATOM", 1, " N", [0.0, 0.0, 0.0], "N"),
            atom_line("HETATM", 2, "NA", [1.0, 2.0, 3.0], "NA"),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line("ATOM", 1, " N", [9.0, 9.0, 9.0], "N"),
            "END".to_string(),
        ]
        .join("\n");
        let atoms = parse_pdb(&content).unwrap();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms[1].element.as_deref(), Some("NA"));
        assert_eq!(atoms[1].position, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_element_column() {
        let mut line = atom_line("ATOM", 7, " HB2", [1.0, 1.0, 1.0], "H");
        line.truncate(66);
        let atoms = parse_pdb(&line).unwrap();
        assert!(atoms[0].element.is_none());
        assert_eq!(atoms[0].name.as_deref(), Some("HB2"));
    }

    #[test]
    fn test_bad_coordinate() {
        let mut line = atom_line("ATOM", 1, " C", [1.0, 2.0, 3.0], "C");
        line.replace_range(38..46, "   abcde");
        let err = parse_pdb(&line).unwrap_err().to_string();
        assert!(err.contains("line 1") && err.contains("y coordinate"), "{}", err);
    }

    #[test]
    fn test_truncated_record() {
        let err = parse_pdb("ATOM      1  CA  ALA A   1      11.104").unwrap_err();
        assert!(matches!(err, ParseError::FormatError { line: 1, .. }));
    }
}
