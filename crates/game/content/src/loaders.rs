//! Loaders for reading board layouts from RON files.
//!
//! File format:
//!
//! ```ron
//! (
//!     rows: [
//!         "PSLFMWDPSLFMW",
//!         "RRPDRRFMRRSL",
//!     ],
//! )
//! ```
//!
//! Rows use the letter codes from [`crate::layout::TERRAIN_CODES`].

use std::path::Path;

use serde::Deserialize;

use riverlands_core::{Hex, TerrainKind};

use crate::layout::decode_rows;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read file {}: {}", path.display(), e))
}

#[derive(Debug, Deserialize)]
struct MapSpec {
    rows: Vec<String>,
}

/// Loads board layouts from RON map files.
pub struct MapLoader;

impl MapLoader {
    /// Parses a layout from RON text.
    pub fn from_str(text: &str) -> LoadResult<Vec<(Hex, TerrainKind)>> {
        let spec: MapSpec = ron::from_str(text)?;
        let rows: Vec<&str> = spec.rows.iter().map(String::as_str).collect();
        decode_rows(&rows).map_err(anyhow::Error::from)
    }

    /// Reads and parses a layout file.
    pub fn from_path(path: &Path) -> LoadResult<Vec<(Hex, TerrainKind)>> {
        Self::from_str(&read_file(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_two_row_map() {
        let text = r#"(
            rows: [
                "PSLFMWDPSLFMW",
                "RRPDRRFMRRSL",
            ],
        )"#;
        let layout = MapLoader::from_str(text).unwrap();
        assert_eq!(layout.len(), 25);
    }

    #[test]
    fn surfaces_layout_errors() {
        let text = r#"(rows: ["XY"])"#;
        assert!(MapLoader::from_str(text).is_err());
    }
}
