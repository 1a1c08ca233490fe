//! Coordinate text format for N-dimensional containers
//!
//! An extension of the [Matrix Market](https://math.nist.gov/MatrixMarket/)
//! coordinate format to any number of dimensions.
//!
//! # Format
//!
//! - A header line: `%%MatrixMarket tensor coordinate real general`
//!   (`matrix` is accepted in place of `tensor` for 2-D data)
//! - Optional comment lines starting with `%`
//! - Size line: `d₀ d₁ ... dₙ₋₁ nnz`
//! - Data lines: `i₀ i₁ ... iₙ₋₁ value` (1-indexed)
//!
//! Values are checked for NaN/Inf while reading; errors name the offending
//! 1-based line of the input.
//!
//! # Examples
//!
//! ```rust
//! use tenpred_sparse::{CooTensor, io};
//! use std::io::Cursor;
//!
//! let indices = vec![vec![0, 0, 1], vec![1, 1, 0], vec![2, 0, 0]];
//! let values = vec![1.0, 2.0, 3.0];
//! let coo = CooTensor::new(indices, values, vec![3, 2, 2]).unwrap();
//!
//! let mut output = Vec::new();
//! io::write_coordinate(&coo, &mut output).unwrap();
//!
//! let coo_back = io::read_coordinate::<f64>(Cursor::new(output)).unwrap();
//! assert_eq!(coo_back, coo);
//! ```

use crate::error::{IndexError, ValidationError};
use crate::{CooTensor, SparseError, SparseResult};
use scirs2_core::numeric::Float;
use std::io::{BufRead, BufReader, Write};
use std::str::FromStr;

/// Object keyword of the header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateObject {
    /// 2-D data (`matrix`)
    Matrix,
    /// N-D data (`tensor`)
    Tensor,
}

/// Value type of the data lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateDataType {
    /// Real numbers
    Real,
    /// Integer numbers
    Integer,
    /// Pattern (no values, every entry is 1)
    Pattern,
}

/// Header information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateHeader {
    pub object: CoordinateObject,
    pub data_type: CoordinateDataType,
}

impl CoordinateHeader {
    /// Parse header from first line
    pub fn parse(line: &str) -> SparseResult<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 5 || parts[0] != "%%MatrixMarket" {
            return Err(SparseError::parse(1, "Invalid Matrix Market header format"));
        }

        let object = match parts[1] {
            "matrix" => CoordinateObject::Matrix,
            "tensor" => CoordinateObject::Tensor,
            other => return Err(SparseError::parse(1, format!("Unknown object: {}", other))),
        };

        if parts[2] != "coordinate" {
            return Err(SparseError::parse(
                1,
                format!("Only coordinate format is supported, got {}", parts[2]),
            ));
        }

        let data_type = match parts[3] {
            "real" => CoordinateDataType::Real,
            "integer" => CoordinateDataType::Integer,
            "pattern" => CoordinateDataType::Pattern,
            other => {
                return Err(SparseError::parse(
                    1,
                    format!("Unknown data type: {}", other),
                ))
            }
        };

        if parts[4] != "general" {
            return Err(SparseError::parse(
                1,
                format!("Only general symmetry is supported, got {}", parts[4]),
            ));
        }

        Ok(Self { object, data_type })
    }

    /// Convert to header line string
    pub fn header_string(&self) -> String {
        let object_str = match self.object {
            CoordinateObject::Matrix => "matrix",
            CoordinateObject::Tensor => "tensor",
        };

        let data_type_str = match self.data_type {
            CoordinateDataType::Real => "real",
            CoordinateDataType::Integer => "integer",
            CoordinateDataType::Pattern => "pattern",
        };

        format!(
            "%%MatrixMarket {} coordinate {} general",
            object_str, data_type_str
        )
    }
}

/// Read a container from coordinate text
///
/// # Complexity
///
/// O(nnz) for reading and parsing
///
/// # Errors
///
/// Parse errors carry the 1-based input line. This includes NaN/Inf
/// values, zero or out-of-range indices and repeated coordinates.
///
/// ```rust
/// use tenpred_sparse::io::read_coordinate;
/// use std::io::Cursor;
///
/// let data = b"%%MatrixMarket tensor coordinate real general
/// 2 2 2 2
/// 1 1 1 0.5
/// 2 2 1 nan
/// ";
/// let err = read_coordinate::<f64>(Cursor::new(data)).unwrap_err();
/// assert!(err.to_string().contains("line 4"));
/// ```
pub fn read_coordinate<T: Float + FromStr>(
    reader: impl std::io::Read,
) -> SparseResult<CooTensor<T>> {
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    let mut line_no = 1;

    reader.read_line(&mut line)?;
    let header = CoordinateHeader::parse(line.trim())?;

    // Skip comment and blank lines
    loop {
        line.clear();
        line_no += 1;
        if reader.read_line(&mut line)? == 0 {
            return Err(SparseError::parse(line_no, "Missing size line"));
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() && !trimmed.starts_with('%') {
            break;
        }
    }

    let size_parts = line
        .split_whitespace()
        .map(|p| p.parse::<usize>())
        .collect::<Result<Vec<usize>, _>>()
        .map_err(|_| SparseError::parse(line_no, "Invalid size line"))?;
    let (nnz, shape) = match size_parts.split_last() {
        Some((&nnz, dims)) if !dims.is_empty() => (nnz, dims.to_vec()),
        _ => return Err(SparseError::parse(line_no, "Invalid size line format")),
    };
    if header.object == CoordinateObject::Matrix && shape.len() != 2 {
        return Err(SparseError::parse(
            line_no,
            format!("Matrix header with {} dimensions", shape.len()),
        ));
    }

    let rank = shape.len();
    let mut indices = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);
    let mut entry_lines = Vec::with_capacity(nnz);

    while indices.len() < nnz {
        line.clear();
        line_no += 1;
        if reader.read_line(&mut line)? == 0 {
            return Err(SparseError::parse(
                line_no,
                format!("Expected {} entries, found {}", nnz, indices.len()),
            ));
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        let expected = if header.data_type == CoordinateDataType::Pattern {
            rank
        } else {
            rank + 1
        };
        if parts.len() != expected {
            return Err(SparseError::parse(
                line_no,
                format!("Expected {} fields, found {}", expected, parts.len()),
            ));
        }

        let mut idx = Vec::with_capacity(rank);
        for part in &parts[..rank] {
            // 1-based on disk
            match part.parse::<usize>() {
                Ok(i) if i > 0 => idx.push(i - 1),
                _ => {
                    return Err(SparseError::parse(
                        line_no,
                        format!("Invalid index '{}'", part),
                    ))
                }
            }
        }

        let value = if header.data_type == CoordinateDataType::Pattern {
            T::one()
        } else {
            parts[rank]
                .parse::<T>()
                .map_err(|_| SparseError::parse(line_no, format!("Invalid value '{}'", parts[rank])))?
        };
        if !value.is_finite() {
            return Err(SparseError::parse(
                line_no,
                format!("Non-finite value '{}'", parts[rank]),
            ));
        }

        indices.push(idx);
        values.push(value);
        entry_lines.push(line_no);
    }

    CooTensor::new(indices, values, shape).map_err(|e| at_entry_line(e, &entry_lines))
}

/// Re-anchor an entry-level validation error to its input line
fn at_entry_line(err: SparseError, entry_lines: &[usize]) -> SparseError {
    let located = |position: usize, reason: String| match entry_lines.get(position) {
        Some(&line) => SparseError::parse(line, reason),
        None => SparseError::parse(0, reason),
    };
    match err {
        SparseError::Validation(ValidationError::DuplicateCoordinate { ref coords, second, .. }) => {
            located(second, format!("Duplicate coordinate {:?}", coords))
        }
        SparseError::Index(IndexError::OutOfBounds {
            position,
            ref index,
            ref shape,
        }) => located(
            position,
            format!("Coordinate {:?} exceeds shape {:?}", index, shape),
        ),
        other => other,
    }
}

/// Write a container as coordinate text
///
/// # Complexity
///
/// O(nnz) for writing
///
/// ```rust
/// use tenpred_sparse::{CooTensor, io};
///
/// let coo = CooTensor::new(vec![vec![0, 0], vec![2, 1]], vec![1.0, 3.0], vec![3, 2]).unwrap();
///
/// let mut output = Vec::new();
/// io::write_coordinate(&coo, &mut output).unwrap();
///
/// let output_str = String::from_utf8(output).unwrap();
/// assert!(output_str.starts_with("%%MatrixMarket matrix coordinate real general"));
/// assert!(output_str.contains("3 2 2"));
/// ```
pub fn write_coordinate<T: Float + std::fmt::Display>(
    coo: &CooTensor<T>,
    writer: &mut impl Write,
) -> SparseResult<()> {
    let header = CoordinateHeader {
        object: if coo.rank() == 2 {
            CoordinateObject::Matrix
        } else {
            CoordinateObject::Tensor
        },
        data_type: CoordinateDataType::Real,
    };
    writeln!(writer, "{}", header.header_string())?;

    let dims: Vec<String> = coo.shape().iter().map(|d| d.to_string()).collect();
    writeln!(writer, "{} {}", dims.join(" "), coo.nnz())?;

    for (idx, val) in coo.iter() {
        for &i in idx {
            write!(writer, "{} ", i + 1)?;
        }
        writeln!(writer, "{}", val)?;
    }

    Ok(())
}
