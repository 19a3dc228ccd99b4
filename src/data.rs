//! This module defines the dense n-dimensional byte container the sampler
//! operates on: an element type tag with a known width, ordered dimension
//! sizes, and the raw bytes.
//!
//! Dimensions are listed fastest-varying first; the *last* entry is the
//! outermost dimension, and fixing one index of it selects a contiguous
//! "row" of the buffer. Rows are the unit of sampling.

use std::fmt;

/// Element type of an [`NdArray`]; every variant has a fixed byte width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Untyped bytes; width 1.
    Byte,
}

impl DType {
    pub fn size_bytes(self) -> usize {
        match self {
            DType::I8 | DType::U8 | DType::Byte => 1,
            DType::I16 | DType::U16 => 2,
            DType::I32 | DType::U32 | DType::F32 => 4,
            DType::I64 | DType::U64 | DType::F64 => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DType::I8 => "i8",
            DType::I16 => "i16",
            DType::I32 => "i32",
            DType::I64 => "i64",
            DType::U8 => "u8",
            DType::U16 => "u16",
            DType::U32 => "u32",
            DType::U64 => "u64",
            DType::F32 => "f32",
            DType::F64 => "f64",
            DType::Byte => "byte",
        }
    }

    /// Parse a dtype name as used on the command-line and in requests.
    pub fn parse(name: &str) -> Option<DType> {
        Some(match name {
            "i8" => DType::I8,
            "i16" => DType::I16,
            "i32" => DType::I32,
            "i64" => DType::I64,
            "u8" => DType::U8,
            "u16" => DType::U16,
            "u32" => DType::U32,
            "u64" => DType::U64,
            "f32" => DType::F32,
            "f64" => DType::F64,
            "byte" => DType::Byte,
            _ => return None,
        })
    }

    /// Stable integer tag for the C boundary.
    pub fn to_tag(self) -> u32 {
        match self {
            DType::I8 => 0,
            DType::I16 => 1,
            DType::I32 => 2,
            DType::I64 => 3,
            DType::U8 => 4,
            DType::U16 => 5,
            DType::U32 => 6,
            DType::U64 => 7,
            DType::F32 => 8,
            DType::F64 => 9,
            DType::Byte => 10,
        }
    }

    pub fn from_tag(tag: u32) -> Option<DType> {
        Some(match tag {
            0 => DType::I8,
            1 => DType::I16,
            2 => DType::I32,
            3 => DType::I64,
            4 => DType::U8,
            5 => DType::U16,
            6 => DType::U32,
            7 => DType::U64,
            8 => DType::F32,
            9 => DType::F64,
            10 => DType::Byte,
            _ => return None,
        })
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An owned, dense, row-major numeric buffer.
///
/// Invariant: `bytes.len() == product(dims) * dtype.size_bytes()`.
#[derive(Debug, Clone, PartialEq)]
pub struct NdArray {
    dtype: DType,
    dims: Vec<usize>,
    bytes: Vec<u8>,
}

impl NdArray {
    /// Allocate a zero-initialized array for the given type and dimensions.
    pub fn owning(dtype: DType, dims: &[usize]) -> NdArray {
        let n_bytes = dims.iter().product::<usize>() * dtype.size_bytes();
        NdArray {
            dtype,
            dims: dims.to_vec(),
            bytes: vec![0u8; n_bytes],
        }
    }

    /// Wrap existing bytes, checking they match the declared shape.
    pub fn from_bytes(dtype: DType, dims: Vec<usize>, bytes: Vec<u8>) -> Result<NdArray, String> {
        let expected = dims.iter().product::<usize>() * dtype.size_bytes();
        if bytes.len() != expected {
            return Err(format!(
                "Expected {} bytes for {} array of dims {:?}, got {}",
                expected,
                dtype,
                dims,
                bytes.len()
            ));
        }
        Ok(NdArray { dtype, dims, bytes })
    }

    pub fn from_f32s(data: &[f32], dims: &[usize]) -> Result<NdArray, String> {
        let bytes = data.iter().flat_map(|x| x.to_le_bytes()).collect();
        NdArray::from_bytes(DType::F32, dims.to_vec(), bytes)
    }

    pub fn from_f64s(data: &[f64], dims: &[usize]) -> Result<NdArray, String> {
        let bytes = data.iter().flat_map(|x| x.to_le_bytes()).collect();
        NdArray::from_bytes(DType::F64, dims.to_vec(), bytes)
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }
    pub fn total_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Size of the outermost dimension: the number of selectable rows.
    pub fn num_rows(&self) -> usize {
        self.dims.last().cloned().unwrap_or(0)
    }

    /// Contiguous byte span of a single row: the product of every dimension
    /// except the outermost, times the element width.
    pub fn row_size_bytes(&self) -> usize {
        if self.dims.is_empty() {
            return 0;
        }
        self.dims[..self.dims.len() - 1].iter().product::<usize>() * self.dtype.size_bytes()
    }
}
