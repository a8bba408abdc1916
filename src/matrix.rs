//! Module matrices and the encoder seam.
//!
//! A [`ModuleMatrix`] is the square grid of dark and light modules produced by
//! an external QR encoder. This crate never encodes data itself; it asks a
//! [`MatrixSource`] for a matrix and treats the result as immutable.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, MatrixError};

/// Side length of a finder pattern, in modules.
pub const FINDER_SIZE: usize = 7;

/// Smallest symbol (version 1).
pub const MIN_SIZE: usize = 21;

/// Largest symbol (version 40).
pub const MAX_SIZE: usize = 177;

/// The error correction level of a QR Code symbol.
///
/// Levels are ordered by redundancy, so `EcLevel::Q > EcLevel::M`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum EcLevel {
    /// Tolerates about 7% erroneous codewords.
    L,
    /// Tolerates about 15% erroneous codewords.
    #[default]
    M,
    /// Tolerates about 25% erroneous codewords.
    Q,
    /// Tolerates about 30% erroneous codewords.
    H,
}

impl EcLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EcLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(EcLevel::L),
            "M" => Ok(EcLevel::M),
            "Q" => Ok(EcLevel::Q),
            "H" => Ok(EcLevel::H),
            _ => Err(ConfigError::UnknownVariant {
                kind: "error correction level",
                value: s.to_string(),
            }),
        }
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Returns true when `(row, col)` lies inside one of the three finder zones
/// of a `size`-module symbol.
///
/// The zones are the 7x7 squares anchored at the top-left, top-right and
/// bottom-left corners. The bottom-right corner carries no finder pattern and
/// is ordinary body area.
pub fn is_eye_zone(size: usize, row: usize, col: usize) -> bool {
    let far = size.saturating_sub(FINDER_SIZE);
    (row < FINDER_SIZE && col < FINDER_SIZE)
        || (row < FINDER_SIZE && col >= far)
        || (row >= far && col < FINDER_SIZE)
}

/// Top-left corners `(x, y)` of the three finder zones.
pub fn finder_origins(size: usize) -> [(usize, usize); 3] {
    let far = size.saturating_sub(FINDER_SIZE);
    [(0, 0), (far, 0), (0, far)]
}

/// An immutable square grid of modules together with the level it was
/// encoded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    /// Width and height in modules, between 21 and 177 inclusive.
    size: usize,
    /// Row-major, `true` = dark.
    modules: Vec<bool>,
    level: EcLevel,
}

impl ModuleMatrix {
    /// Builds a matrix from row-major module values.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::InvalidSize`] unless `size` is a valid symbol
    /// size (`17 + 4 * version`), and [`MatrixError::NotSquare`] when the
    /// buffer length is not `size * size`.
    pub fn from_modules(size: usize, modules: Vec<bool>, level: EcLevel) -> Result<Self, MatrixError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&size) || (size - MIN_SIZE) % 4 != 0 {
            return Err(MatrixError::InvalidSize(size));
        }
        if modules.len() != size * size {
            return Err(MatrixError::NotSquare {
                size,
                expected: size * size,
                actual: modules.len(),
            });
        }
        Ok(Self { size, modules, level })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn level(&self) -> EcLevel {
        self.level
    }

    /// Returns the module at column `col`, row `row`. Coordinates outside the
    /// symbol read as light.
    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.size && row < self.size && self.modules[row * self.size + col]
    }

    /// Number of dark modules, finder zones included.
    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|&&m| m).count()
    }

    /// Dark modules outside the finder zones as `(row, col)`, in row-major
    /// order. These are the modules the body glyph is drawn for.
    pub fn body_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.modules
            .iter()
            .enumerate()
            .filter(|(_, &dark)| dark)
            .map(move |(i, _)| (i / size, i % size))
            .filter(move |&(row, col)| !is_eye_zone(size, row, col))
    }
}

/// Console rendering with a four-module quiet zone, two characters per module.
impl fmt::Display for ModuleMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let border: i64 = 4;
        let size = self.size as i64;
        for y in -border..size + border {
            for x in -border..size + border {
                let dark = x >= 0 && y >= 0 && self.get(x as usize, y as usize);
                let c = if dark { '█' } else { ' ' };
                write!(f, "{0}{0}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Produces module matrices from payload data.
///
/// Implementations are the external encoder collaborator. Failures are fatal
/// to the render pass that asked for the matrix.
pub trait MatrixSource {
    fn encode(&self, payload: &str, level: EcLevel) -> Result<ModuleMatrix, MatrixError>;
}

/// [`MatrixSource`] backed by the `qrcode` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrEncoder;

impl MatrixSource for QrEncoder {
    fn encode(&self, payload: &str, level: EcLevel) -> Result<ModuleMatrix, MatrixError> {
        let code = qrcode::QrCode::with_error_correction_level(payload.as_bytes(), level.into())
            .map_err(|e| MatrixError::Encode(e.to_string()))?;
        let size = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        log::debug!("encoded {} bytes into a {}x{} symbol at level {}", payload.len(), size, size, level);
        ModuleMatrix::from_modules(size, modules, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_sizes() -> impl Iterator<Item = usize> {
        (MIN_SIZE..=MAX_SIZE).step_by(4)
    }

    #[test]
    fn test_eye_zone_covers_exactly_three_finders() {
        for n in all_sizes() {
            let mut count = 0;
            for row in 0..n {
                for col in 0..n {
                    if is_eye_zone(n, row, col) {
                        count += 1;
                    }
                }
            }
            assert_eq!(count, 3 * 49, "size {}", n);
        }
    }

    #[test]
    fn test_fourth_corner_is_never_an_eye() {
        for n in all_sizes() {
            for row in n - 7..n {
                for col in n - 7..n {
                    assert!(!is_eye_zone(n, row, col), "size {} cell ({}, {})", n, row, col);
                }
            }
        }
    }

    #[test]
    fn test_finder_origins() {
        assert_eq!(finder_origins(21), [(0, 0), (14, 0), (0, 14)]);
        assert_eq!(finder_origins(177), [(0, 0), (170, 0), (0, 170)]);
    }

    #[test]
    fn test_from_modules_rejects_bad_sizes() {
        assert!(matches!(
            ModuleMatrix::from_modules(22, vec![false; 22 * 22], EcLevel::M),
            Err(MatrixError::InvalidSize(22))
        ));
        assert!(matches!(
            ModuleMatrix::from_modules(21, vec![false; 20], EcLevel::M),
            Err(MatrixError::NotSquare { .. })
        ));
    }

    #[test]
    fn test_get_reads_column_then_row() {
        let mut modules = vec![false; 21 * 21];
        modules[2 * 21 + 9] = true; // row 2, col 9
        let m = ModuleMatrix::from_modules(21, modules, EcLevel::L).unwrap();
        assert!(m.get(9, 2));
        assert!(!m.get(2, 9));
        assert!(!m.get(40, 2));
    }

    #[test]
    fn test_body_cells_skip_finders() {
        let m = ModuleMatrix::from_modules(21, vec![true; 21 * 21], EcLevel::L).unwrap();
        assert_eq!(m.dark_count(), 441);
        assert_eq!(m.body_cells().count(), 441 - 147);
        assert!(m.body_cells().any(|cell| cell == (20, 20)));
    }

    #[test]
    fn test_encoder_produces_version_one() {
        let m = QrEncoder.encode("Hello, world!", EcLevel::L).unwrap();
        assert_eq!(m.size(), 21);
        assert_eq!(m.level(), EcLevel::L);
        // Finder centres are always dark.
        assert!(m.get(3, 3));
        assert!(m.get(17, 3));
        assert!(m.get(3, 17));
    }

    #[test]
    fn test_encoder_reports_oversized_payloads() {
        let payload = "x".repeat(4000);
        assert!(matches!(QrEncoder.encode(&payload, EcLevel::H), Err(MatrixError::Encode(_))));
    }

    #[test]
    fn test_display_includes_quiet_zone() {
        let m = QrEncoder.encode("HELLO", EcLevel::M).unwrap();
        let text = m.to_string();
        assert_eq!(text.lines().count(), 21 + 8);
    }

    #[test]
    fn test_level_ordering_and_parsing() {
        assert!(EcLevel::H > EcLevel::Q);
        assert!(EcLevel::Q > EcLevel::M);
        assert_eq!("q".parse::<EcLevel>().unwrap(), EcLevel::Q);
        assert!("X".parse::<EcLevel>().is_err());
    }
}
