//! Anna Matrix - Fixed 128×128 table of signed bytes
//!
//! Loaded once from JSON and never written afterwards. Two file shapes are
//! accepted:
//!
//! ```json
//! {"matrix": [[-27, 3, ...], ...]}
//! [[-27, 3, ...], ...]
//! ```
//!
//! String cells are placeholders for unknown values. They read as 0 and are
//! tracked separately so statistics and symmetry checks can skip them.
//!
//! # Point symmetry
//!
//! Most cells satisfy `value[r][c] + value[127-r][127-c] == -1`. Pairs that do
//! not are reported as [`Anomaly`] records.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AigarthError, Result};

/// Matrix side length
pub const MATRIX_DIM: usize = 128;

/// Expected `value + mirror_value` for a point-symmetric pair
pub const SYMMETRY_SUM: i16 = -1;

/// The Anna Matrix
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnaMatrix {
    /// Row-major cells
    cells: Vec<i8>,
    /// Row-major placeholder flags
    placeholders: Vec<bool>,
}

impl AnnaMatrix {
    /// All-zero matrix, no placeholders
    pub fn zeroed() -> Self {
        Self {
            cells: vec![0; MATRIX_DIM * MATRIX_DIM],
            placeholders: vec![false; MATRIX_DIM * MATRIX_DIM],
        }
    }

    /// Build from explicit rows (must be 128×128)
    pub fn from_rows(rows: Vec<Vec<i8>>) -> Result<Self> {
        check_shape(&rows.iter().map(Vec::len).collect::<Vec<_>>())?;
        Ok(Self {
            cells: rows.into_iter().flatten().collect(),
            placeholders: vec![false; MATRIX_DIM * MATRIX_DIM],
        })
    }

    /// Parse either file shape
    pub fn from_json_str(json: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(json)?;
        let rows = match &root {
            Value::Object(map) => map.get("matrix").ok_or_else(|| {
                AigarthError::InvalidInput("matrix object has no \"matrix\" key".into())
            })?,
            other => other,
        };
        let rows = rows
            .as_array()
            .ok_or_else(|| AigarthError::InvalidInput("matrix must be a 2D array".into()))?;

        let mut widths = Vec::with_capacity(rows.len());
        let mut cells = Vec::with_capacity(MATRIX_DIM * MATRIX_DIM);
        let mut placeholders = Vec::with_capacity(MATRIX_DIM * MATRIX_DIM);

        for (r, row) in rows.iter().enumerate() {
            let row = row.as_array().ok_or_else(|| {
                AigarthError::InvalidInput(format!("matrix row {} is not an array", r))
            })?;
            widths.push(row.len());
            for (c, cell) in row.iter().enumerate() {
                let (value, placeholder) = parse_cell(cell, r, c)?;
                cells.push(value);
                placeholders.push(placeholder);
            }
        }

        check_shape(&widths)?;

        let matrix = Self { cells, placeholders };
        let count = matrix.placeholder_count();
        if count > 0 {
            log::debug!("Matrix has {} placeholder cells (read as 0)", count);
        }
        Ok(matrix)
    }

    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let matrix = Self::from_json_str(&text)?;
        log::info!("Loaded Anna Matrix from {}", path.as_ref().display());
        Ok(matrix)
    }

    #[inline]
    fn offset(row: usize, col: usize) -> usize {
        row * MATRIX_DIM + col
    }

    /// Cell value, `None` outside the matrix
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<i8> {
        if row < MATRIX_DIM && col < MATRIX_DIM {
            Some(self.cells[Self::offset(row, col)])
        } else {
            None
        }
    }

    /// Cell value with both indices taken modulo 128
    #[inline]
    pub fn get_wrapped(&self, row: usize, col: usize) -> i8 {
        self.cells[Self::offset(row % MATRIX_DIM, col % MATRIX_DIM)]
    }

    /// Whether the cell held a placeholder in the source file
    pub fn is_placeholder(&self, row: usize, col: usize) -> bool {
        row < MATRIX_DIM && col < MATRIX_DIM && self.placeholders[Self::offset(row, col)]
    }

    /// Number of placeholder cells
    pub fn placeholder_count(&self) -> usize {
        self.placeholders.iter().filter(|&&p| p).count()
    }

    /// One row
    pub fn row(&self, row: usize) -> Option<&[i8]> {
        (row < MATRIX_DIM).then(|| &self.cells[row * MATRIX_DIM..(row + 1) * MATRIX_DIM])
    }

    /// One column (copied)
    pub fn column(&self, col: usize) -> Option<Vec<i8>> {
        (col < MATRIX_DIM).then(|| (0..MATRIX_DIM).map(|r| self.cells[Self::offset(r, col)]).collect())
    }

    /// Point-mirror position
    #[inline]
    pub const fn mirror(row: usize, col: usize) -> (usize, usize) {
        (MATRIX_DIM - 1 - row, MATRIX_DIM - 1 - col)
    }

    /// Whether a real (non-placeholder) pair breaks point symmetry
    pub fn is_anomalous(&self, row: usize, col: usize) -> bool {
        if row >= MATRIX_DIM || col >= MATRIX_DIM {
            return false;
        }
        let (mr, mc) = Self::mirror(row, col);
        if self.is_placeholder(row, col) || self.is_placeholder(mr, mc) {
            return false;
        }
        self.get_wrapped(row, col) as i16 + self.get_wrapped(mr, mc) as i16 != SYMMETRY_SUM
    }

    /// Every asymmetric pair, once, keyed by its first position in row-major order
    ///
    /// Pairs involving a placeholder are skipped.
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut out = Vec::new();
        for row in 0..MATRIX_DIM {
            for col in 0..MATRIX_DIM {
                let (mr, mc) = Self::mirror(row, col);
                if Self::offset(row, col) >= Self::offset(mr, mc) {
                    continue;
                }
                if self.is_anomalous(row, col) {
                    let value = self.get_wrapped(row, col);
                    let mirror_value = self.get_wrapped(mr, mc);
                    out.push(Anomaly {
                        pos: [row, col],
                        value,
                        mirror_pos: [mr, mc],
                        mirror_value,
                        sum: value as i16 + mirror_value as i16,
                    });
                }
            }
        }
        out
    }

    /// Summary statistics over non-placeholder cells
    pub fn stats(&self) -> MatrixStats {
        let mut min = i8::MAX;
        let mut max = i8::MIN;
        let mut total: i64 = 0;
        let mut counted = 0usize;
        let mut zero_count = 0;
        let mut positive_count = 0;
        let mut negative_count = 0;

        for (&v, &placeholder) in self.cells.iter().zip(&self.placeholders) {
            if placeholder {
                continue;
            }
            counted += 1;
            total += v as i64;
            min = min.min(v);
            max = max.max(v);
            match v {
                0 => zero_count += 1,
                v if v > 0 => positive_count += 1,
                _ => negative_count += 1,
            }
        }

        let anomaly_count = self.anomalies().len();
        let mut symmetric_pairs = 0;
        for row in 0..MATRIX_DIM {
            for col in 0..MATRIX_DIM {
                let (mr, mc) = Self::mirror(row, col);
                if Self::offset(row, col) < Self::offset(mr, mc)
                    && !self.is_placeholder(row, col)
                    && !self.is_placeholder(mr, mc)
                    && !self.is_anomalous(row, col)
                {
                    symmetric_pairs += 1;
                }
            }
        }

        let (min, max, mean) = if counted == 0 {
            (0, 0, 0.0)
        } else {
            (min, max, total as f64 / counted as f64)
        };

        MatrixStats {
            rows: MATRIX_DIM,
            cols: MATRIX_DIM,
            min,
            max,
            mean,
            zero_count,
            placeholder_count: self.placeholder_count(),
            positive_count,
            negative_count,
            anomaly_count,
            symmetric_pairs,
        }
    }

    /// Sum of all cells
    pub fn total(&self) -> i64 {
        self.cells.iter().map(|&v| v as i64).sum()
    }
}

fn check_shape(widths: &[usize]) -> Result<()> {
    let rows = widths.len();
    let bad_width = widths.iter().copied().find(|&w| w != MATRIX_DIM);
    if rows != MATRIX_DIM || bad_width.is_some() {
        return Err(AigarthError::MatrixShape {
            rows,
            cols: bad_width.or_else(|| widths.first().copied()).unwrap_or(0),
            expected: MATRIX_DIM,
        });
    }
    Ok(())
}

/// Returns (value, is_placeholder)
fn parse_cell(cell: &Value, row: usize, col: usize) -> Result<(i8, bool)> {
    match cell {
        Value::String(_) | Value::Null => Ok((0, true)),
        Value::Number(n) => n
            .as_i64()
            .and_then(|v| i8::try_from(v).ok())
            .map(|v| (v, false))
            .ok_or_else(|| AigarthError::InvalidCell {
                row,
                col,
                value: n.to_string(),
            }),
        other => Err(AigarthError::InvalidCell {
            row,
            col,
            value: other.to_string(),
        }),
    }
}

/// Matrix statistics
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixStats {
    pub rows: usize,
    pub cols: usize,
    pub min: i8,
    pub max: i8,
    pub mean: f64,
    pub zero_count: usize,
    pub placeholder_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub anomaly_count: usize,
    pub symmetric_pairs: usize,
}

/// A cell pair that breaks point symmetry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    pub pos: [usize; 2],
    pub value: i8,
    pub mirror_pos: [usize; 2],
    pub mirror_value: i8,
    pub sum: i16,
}

/// `anna-matrix-anomalies.json` contents
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub anomalies: Vec<Anomaly>,
}

impl AnomalyReport {
    /// Derive from a matrix
    pub fn from_matrix(matrix: &AnnaMatrix) -> Self {
        Self {
            anomalies: matrix.anomalies(),
        }
    }

    /// Load from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Anna coordinates: `x` grows rightwards, `y` grows upwards, both in `-64..=63`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnaCoord {
    pub x: i64,
    pub y: i64,
}

impl AnnaCoord {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Matrix (row, col); out-of-range coordinates wrap
    pub fn to_matrix(self) -> (usize, usize) {
        let dim = MATRIX_DIM as i64;
        let row = (63 - self.y).rem_euclid(dim) as usize;
        let col = (self.x + 64).rem_euclid(dim) as usize;
        (row, col)
    }

    /// Inverse of [`AnnaCoord::to_matrix`]
    pub fn from_matrix(row: usize, col: usize) -> Self {
        let row = (row % MATRIX_DIM) as i64;
        let col = (col % MATRIX_DIM) as i64;
        Self {
            x: col - 64,
            y: 63 - row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Perfectly point-symmetric matrix: value[r][c] = (r + c) as i8 mirrored to -1 - v
    fn symmetric_rows() -> Vec<Vec<i8>> {
        let mut rows = vec![vec![0i8; MATRIX_DIM]; MATRIX_DIM];
        for r in 0..MATRIX_DIM {
            for c in 0..MATRIX_DIM {
                let (mr, mc) = AnnaMatrix::mirror(r, c);
                if r * MATRIX_DIM + c < mr * MATRIX_DIM + mc {
                    let v = ((r * 7 + c * 3) % 100) as i8 - 50;
                    rows[r][c] = v;
                    rows[mr][mc] = -1 - v;
                }
            }
        }
        rows
    }

    fn rows_to_json(rows: &[Vec<i8>]) -> String {
        serde_json::to_string(&serde_json::json!({ "matrix": rows })).unwrap()
    }

    #[test]
    fn test_parse_object_and_bare_array() {
        let rows = symmetric_rows();
        let from_obj = AnnaMatrix::from_json_str(&rows_to_json(&rows)).unwrap();
        let from_bare = AnnaMatrix::from_json_str(&serde_json::to_string(&rows).unwrap()).unwrap();
        assert_eq!(from_obj, from_bare);
        assert_eq!(from_obj.get(5, 9), Some(rows[5][9]));
        assert_eq!(from_obj.get(128, 0), None);
    }

    #[test]
    fn test_placeholder_normalized_to_zero() {
        let mut value: Value = serde_json::to_value(symmetric_rows()).unwrap();
        value[3][4] = Value::String("00000000".into());

        let matrix = AnnaMatrix::from_json_str(&value.to_string()).unwrap();
        assert_eq!(matrix.get(3, 4), Some(0));
        assert!(matrix.is_placeholder(3, 4));
        assert_eq!(matrix.placeholder_count(), 1);

        // Placeholder is neither a zero nor a non-zero in the stats
        let stats = matrix.stats();
        assert_eq!(stats.placeholder_count, 1);
        assert_eq!(
            stats.zero_count + stats.positive_count + stats.negative_count,
            MATRIX_DIM * MATRIX_DIM - 1
        );
        // And its pair is not flagged as an anomaly
        assert!(matrix.anomalies().is_empty());
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let rows = vec![vec![0i8; MATRIX_DIM]; 10];
        let err = AnnaMatrix::from_json_str(&serde_json::to_string(&rows).unwrap()).unwrap_err();
        assert!(matches!(err, AigarthError::MatrixShape { rows: 10, .. }));

        let mut rows = vec![vec![0i8; MATRIX_DIM]; MATRIX_DIM];
        rows[7].pop();
        assert!(matches!(
            AnnaMatrix::from_rows(rows),
            Err(AigarthError::MatrixShape { cols: 127, .. })
        ));
    }

    #[test]
    fn test_out_of_range_cell_rejected() {
        let mut value: Value = serde_json::to_value(symmetric_rows()).unwrap();
        value[0][1] = serde_json::json!(300);
        let err = AnnaMatrix::from_json_str(&value.to_string()).unwrap_err();
        assert!(matches!(err, AigarthError::InvalidCell { row: 0, col: 1, .. }));
    }

    #[test]
    fn test_anomalies_reported_once() {
        let mut rows = symmetric_rows();
        assert!(AnnaMatrix::from_rows(rows.clone()).unwrap().anomalies().is_empty());

        rows[2][3] = 10;
        rows[125][124] = 10;
        let matrix = AnnaMatrix::from_rows(rows).unwrap();
        let anomalies = matrix.anomalies();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].pos, [2, 3]);
        assert_eq!(anomalies[0].mirror_pos, [125, 124]);
        assert_eq!(anomalies[0].sum, 20);
        assert!(matrix.is_anomalous(125, 124));

        let stats = matrix.stats();
        assert_eq!(stats.anomaly_count, 1);
        assert_eq!(stats.symmetric_pairs, MATRIX_DIM * MATRIX_DIM / 2 - 1);
    }

    #[test]
    fn test_anomaly_report_file_format() {
        use tempfile::tempdir;

        let mut rows = symmetric_rows();
        rows[0][0] = 5;
        let report = AnomalyReport::from_matrix(&AnnaMatrix::from_rows(rows).unwrap());

        let dir = tempdir().unwrap();
        let path = dir.path().join("anna-matrix-anomalies.json");
        report.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"mirrorPos\""));
        assert!(text.contains("\"mirrorValue\""));
        assert_eq!(AnomalyReport::load(&path).unwrap(), report);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            AnnaMatrix::load("definitely/does/not/exist.json"),
            Err(AigarthError::Io(_))
        ));
    }

    #[test]
    fn test_rows_and_columns() {
        let rows = symmetric_rows();
        let matrix = AnnaMatrix::from_rows(rows.clone()).unwrap();
        assert_eq!(matrix.row(4).unwrap(), rows[4].as_slice());
        assert_eq!(matrix.column(9).unwrap()[17], rows[17][9]);
        assert!(matrix.row(200).is_none());
        assert_eq!(matrix.get_wrapped(130, 1), rows[2][1]);
    }

    #[test]
    fn test_coord_transform() {
        assert_eq!(AnnaCoord::new(0, 0).to_matrix(), (63, 64));
        assert_eq!(AnnaCoord::new(-64, 63).to_matrix(), (0, 0));
        assert_eq!(AnnaCoord::new(63, -64).to_matrix(), (127, 127));
        for row in (0..MATRIX_DIM).step_by(13) {
            for col in (0..MATRIX_DIM).step_by(11) {
                assert_eq!(AnnaCoord::from_matrix(row, col).to_matrix(), (row, col));
            }
        }
    }
}
