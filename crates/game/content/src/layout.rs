//! The stock board layout.
//!
//! Maps are written as rows of one-letter terrain codes, alternating 13 and
//! 12 hexes. Row strings convert to axial coordinates with the odd rows
//! shifted half a hex right.

use riverlands_core::{Hex, TerrainKind};

/// Terrain letter codes: one per land terrain plus `R` for river.
pub const TERRAIN_CODES: [(char, TerrainKind); 8] = [
    ('P', TerrainKind::Plains),
    ('S', TerrainKind::Swamp),
    ('L', TerrainKind::Lake),
    ('F', TerrainKind::Forest),
    ('M', TerrainKind::Mountain),
    ('W', TerrainKind::Wasteland),
    ('D', TerrainKind::Desert),
    ('R', TerrainKind::River),
];

/// The stock nine-row map. Two river arms cross it, one splitting the
/// north-west quarter, one winding through the southern half.
pub const BASE_ROWS: [&str; 9] = [
    "PSLFMWDPSLFMW",
    "RRPDRRFMRRSL",
    "SLRFWRDPLRFMW",
    "FMRSLRWDRPSL",
    "WDPRRMSLRFMDP",
    "DPSLRRFWRRLS",
    "LFMWDRPSLRDFM",
    "MWDPLRSFMRPS",
    "PSLFMRWDPLSFW",
];

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown terrain code {code:?} in row {row}")]
    UnknownCode { row: usize, code: char },

    #[error("row {row} has {len} hexes, expected {expected}")]
    BadRowLength {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Decodes row strings into a board layout table.
///
/// Even rows carry thirteen hexes, odd rows twelve.
pub fn decode_rows(rows: &[&str]) -> Result<Vec<(Hex, TerrainKind)>, LayoutError> {
    let mut layout = Vec::new();
    for (row, codes) in rows.iter().enumerate() {
        let expected = if row % 2 == 0 { 13 } else { 12 };
        let len = codes.chars().count();
        if len != expected {
            return Err(LayoutError::BadRowLength { row, len, expected });
        }
        for (col, code) in codes.chars().enumerate() {
            let terrain = TERRAIN_CODES
                .iter()
                .find(|(c, _)| *c == code)
                .map(|&(_, t)| t)
                .ok_or(LayoutError::UnknownCode { row, code })?;
            let r = row as i32;
            let q = col as i32 - (r - (r & 1)) / 2;
            layout.push((Hex::new(q, r), terrain));
        }
    }
    Ok(layout)
}

/// The stock map, decoded.
pub fn base_layout() -> Vec<(Hex, TerrainKind)> {
    // The constant rows are well formed.
    decode_rows(&BASE_ROWS).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_layout_decodes_every_hex() {
        let layout = base_layout();
        // Five rows of 13 plus four rows of 12.
        assert_eq!(layout.len(), 5 * 13 + 4 * 12);
        assert!(layout.iter().any(|&(_, t)| t == TerrainKind::River));
    }

    #[test]
    fn rows_of_the_wrong_width_are_rejected() {
        let err = decode_rows(&["PPP"]).unwrap_err();
        assert_eq!(
            err,
            LayoutError::BadRowLength {
                row: 0,
                len: 3,
                expected: 13
            }
        );
    }

    #[test]
    fn unknown_codes_are_rejected() {
        let row = "PSLFMWDPSLFMX";
        let err = decode_rows(&[row]).unwrap_err();
        assert_eq!(err, LayoutError::UnknownCode { row: 0, code: 'X' });
    }
}
