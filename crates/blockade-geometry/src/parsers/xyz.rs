//! Parser for `.xyz` molecular coordinate files.
//!
//! The XYZ format is a simple plain-text format:
//! ```text
//! <num_atoms>
//! <comment line>
//! <element> <x> <y> <z>
//! <element> <x> <y> <z>
//! ...
//! ```
//!
//! Coordinates are in angstroms and are returned unchanged. The leading
//! label is taken as the element symbol; columns after `z` (extended XYZ
//! properties) are ignored. A trajectory file holds several frames back to
//! back; only the first is read.

use super::{parse_coord, ParseError, ParsedAtom};

/// Parse the first frame of an XYZ file.
pub fn parse_xyz(content: &str) -> Result<Vec<ParsedAtom>, ParseError> {
    let mut lines = content.lines().enumerate();

    let count_line = lines.next().map(|(_, l)| l.trim()).unwrap_or("");
    let expected: usize = count_line.parse().map_err(|_| ParseError::FormatError {
        line: 1,
        message: format!("expected an atom count, got '{count_line}'"),
    })?;
    if lines.next().is_none() {
        return Err(ParseError::FormatError {
            line: 2,
            message: "missing comment line".into(),
        });
    }

    let mut atoms = Vec::with_capacity(expected);
    for (idx, raw) in lines {
        if atoms.len() == expected {
            break;
        }
        let line_no = idx + 1;
        let mut cols = raw.split_whitespace();
        let Some(label) = cols.next() else {
            continue;
        };
        let (Some(x), Some(y), Some(z)) = (cols.next(), cols.next(), cols.next()) else {
            return Err(ParseError::FormatError {
                line: line_no,
                message: format!("expected 'label x y z', got '{}'", raw.trim()),
            });
        };
        atoms.push(ParsedAtom {
            position: [
                parse_coord(x, 'x', line_no)?,
                parse_coord(y, 'y', line_no)?,
                parse_coord(z, 'z', line_no)?,
            ],
            element: Some(label.to_string()),
            name: Some(label.to_string()),
            atom_type: None,
            radius: None,
        });
    }

    if atoms.len() != expected {
        return Err(ParseError::FormatError {
            line: 1,
            message: format!("count line says {expected} atoms, file has {}", atoms.len()),
        });
    }
    Ok(atoms)
}
