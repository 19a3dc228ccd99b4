//! Row-subsampling core: pick which rows of a dense array survive, then
//! copy them (in source order) into a freshly allocated output array.
//!
//! A "row" is the contiguous byte span selected by one index of the
//! outermost dimension; see [`crate::data::NdArray::row_size_bytes`].
//! All randomized policies draw from a generator seeded fresh per call,
//! so a `(mode, seed, rate)` triple always reproduces the same output.

use crate::data::NdArray;
use crate::randutil;
use oorandom::Rand64;
use ordered_float::NotNan;
use std::fmt;

/// Why a sampling call was rejected. No partial output is ever produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    /// The mode string is not one of the recognized policies.
    InvalidMode(String),
    /// The rate is NaN or outside `(0, 1]`.
    InvalidRate(f64),
    /// The input has no dimensions, or a zero-sized outermost dimension.
    EmptyInput,
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::InvalidMode(mode) => write!(f, "Unsupported sampling mode: {}", mode),
            SampleError::InvalidRate(rate) => {
                write!(f, "Sampling rate must be in (0, 1]: {}", rate)
            }
            SampleError::EmptyInput => write!(f, "Input array has no rows to sample"),
        }
    }
}

impl std::error::Error for SampleError {}

/// The three row-selection policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SampleMode {
    /// Uniform draws that may repeat a row.
    WithReplacement,
    /// Uniform draws with every row picked at most once.
    WithoutReplacement,
    /// Every `stride`-th row; deterministic, ignores the seed.
    Decimate,
}

pub const MODE_NAMES: [&str; 3] = ["with-replacement", "without-replacement", "decimate"];

impl SampleMode {
    /// Parse a mode name. The short spellings `wr` and `wor` are accepted
    /// as aliases and normalized to the canonical names.
    pub fn parse(name: &str) -> Result<SampleMode, SampleError> {
        Ok(match name {
            "with-replacement" | "wr" => SampleMode::WithReplacement,
            "without-replacement" | "wor" => SampleMode::WithoutReplacement,
            "decimate" => SampleMode::Decimate,
            unkn => return Err(SampleError::InvalidMode(unkn.to_string())),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SampleMode::WithReplacement => "with-replacement",
            SampleMode::WithoutReplacement => "without-replacement",
            SampleMode::Decimate => "decimate",
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated configuration snapshot. Construction is the only place the
/// rate is checked, so every downstream call can trust it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleOptions {
    pub mode: SampleMode,
    pub seed: u64,
    pub rate: NotNan<f64>,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            mode: SampleMode::WithoutReplacement,
            seed: 0,
            rate: NotNan::new(1.0).expect("1.0 is not NaN"),
        }
    }
}

impl SampleOptions {
    pub fn try_new(mode: SampleMode, seed: u64, rate: f64) -> Result<SampleOptions, SampleError> {
        let rate = NotNan::new(rate).map_err(|_| SampleError::InvalidRate(rate))?;
        if rate.into_inner() <= 0.0 || rate.into_inner() > 1.0 {
            return Err(SampleError::InvalidRate(rate.into_inner()));
        }
        Ok(SampleOptions { mode, seed, rate })
    }
}

/// Number of rows the configured policy retains out of `total_rows`.
///
/// For the random policies this is `floor(rate * total_rows)`. For
/// decimation it is `ceil(total_rows / stride)` for the stride found by
/// [`decimate_stride`]. Requires `total_rows > 0`.
pub fn sample_size(mode: SampleMode, rate: f64, total_rows: usize) -> usize {
    match mode {
        SampleMode::WithReplacement | SampleMode::WithoutReplacement => {
            (rate * total_rows as f64).floor() as usize
        }
        SampleMode::Decimate => decimate_stride(rate, total_rows).1,
    }
}

/// Find the smallest stride whose kept fraction does not exceed `rate`.
///
/// Returns `(stride, sample_size)`. The search is linear from stride 1 and
/// stops at `stride == total_rows` (a single kept row), which bounds it
/// even for rates below `1 / total_rows`.
pub fn decimate_stride(rate: f64, total_rows: usize) -> (usize, usize) {
    let mut stride = 0;
    loop {
        stride += 1;
        let size = (total_rows + stride - 1) / stride;
        if (size as f64) / (total_rows as f64) <= rate || stride >= total_rows {
            return (stride, size);
        }
    }
}

/// Pick the surviving row indices, in ascending order.
///
/// The returned list always has exactly the length [`sample_size`]
/// computes; with-replacement output may contain repeats (adjacent after
/// sorting), the other policies never do.
pub fn select_rows(opts: &SampleOptions, total_rows: usize) -> Vec<usize> {
    let count = sample_size(opts.mode, opts.rate.into_inner(), total_rows);
    let mut rand = Rand64::new(opts.seed.into());
    match opts.mode {
        SampleMode::WithReplacement => {
            let identity: Vec<usize> = (0..total_rows).collect();
            let mut rows = randutil::sample_with_replacement(&identity, &mut rand, count);
            rows.sort_unstable();
            rows
        }
        SampleMode::WithoutReplacement => {
            let identity: Vec<usize> = (0..total_rows).collect();
            let mut rows = randutil::sample_without_replacement(&identity, &mut rand, count);
            rows.sort_unstable();
            rows
        }
        SampleMode::Decimate => {
            let (stride, count) = decimate_stride(opts.rate.into_inner(), total_rows);
            // Fill every one of the `count` slots; (count - 1) * stride is
            // always below total_rows.
            let mut rows = Vec::with_capacity(count);
            for k in 0..count {
                rows.push(k * stride);
            }
            rows
        }
    }
}

/// Run the transform: select rows, then copy each selected row's byte span
/// into a new array whose outermost dimension is the sample size.
pub fn compress(opts: &SampleOptions, input: &NdArray) -> Result<NdArray, SampleError> {
    if input.dims().is_empty() || input.num_rows() == 0 {
        return Err(SampleError::EmptyInput);
    }
    let rows = select_rows(opts, input.num_rows());
    let row_size = input.row_size_bytes();

    let mut out_dims = input.dims().to_vec();
    let last = out_dims.len() - 1;
    out_dims[last] = rows.len();

    let mut output = NdArray::owning(input.dtype(), &out_dims);
    let src = input.bytes();
    let dst = output.bytes_mut();
    for (k, row) in rows.iter().cloned().enumerate() {
        let from = row * row_size;
        dst[k * row_size..(k + 1) * row_size].copy_from_slice(&src[from..from + row_size]);
    }
    Ok(output)
}

/// The reverse path returns an unmodified, independent copy of its input.
/// Sampling discards rows, so there is nothing to reconstruct; this is
/// deliberately not an inverse of [`compress`].
pub fn decompress(input: &NdArray) -> NdArray {
    input.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DType;

    fn opts(mode: SampleMode, seed: u64, rate: f64) -> SampleOptions {
        SampleOptions::try_new(mode, seed, rate).unwrap()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            SampleMode::parse("with-replacement").unwrap(),
            SampleMode::WithReplacement
        );
        assert_eq!(
            SampleMode::parse("without-replacement").unwrap(),
            SampleMode::WithoutReplacement
        );
        assert_eq!(SampleMode::parse("decimate").unwrap(), SampleMode::Decimate);
        // Short aliases normalize to the canonical modes.
        assert_eq!(SampleMode::parse("wr").unwrap(), SampleMode::WithReplacement);
        assert_eq!(
            SampleMode::parse("wor").unwrap(),
            SampleMode::WithoutReplacement
        );

        let err = SampleMode::parse("bogus").unwrap_err();
        assert_eq!(err, SampleError::InvalidMode("bogus".to_string()));
        assert!(format!("{}", err).contains("bogus"));
    }

    #[test]
    fn test_rate_validation() {
        assert!(SampleOptions::try_new(SampleMode::Decimate, 0, 1.0).is_ok());
        assert!(SampleOptions::try_new(SampleMode::Decimate, 0, 0.0001).is_ok());
        for bad in [0.0, -0.5, 1.0001, f64::NAN] {
            let err = SampleOptions::try_new(SampleMode::Decimate, 0, bad).unwrap_err();
            assert!(matches!(err, SampleError::InvalidRate(_)), "{:?}", bad);
        }
    }

    #[test]
    fn test_sample_size_floor() {
        for mode in [SampleMode::WithReplacement, SampleMode::WithoutReplacement] {
            assert_eq!(sample_size(mode, 1.0, 10), 10);
            assert_eq!(sample_size(mode, 0.5, 10), 5);
            assert_eq!(sample_size(mode, 0.55, 10), 5);
            assert_eq!(sample_size(mode, 0.05, 10), 0);
        }
    }

    #[test]
    fn test_decimate_stride_search() {
        // ceil(100/10)/100 = 0.1 <= 0.1, and stride 9 keeps too much.
        assert_eq!(decimate_stride(0.1, 100), (10, 10));
        assert_eq!(decimate_stride(1.0, 100), (1, 100));
        assert_eq!(decimate_stride(0.5, 4), (2, 2));
        // Rates below 1/total stop at the single-row floor.
        assert_eq!(decimate_stride(0.001, 100), (100, 1));
    }

    #[test]
    fn test_with_replacement_full_rate() {
        let rows = select_rows(&opts(SampleMode::WithReplacement, 0xdeadbeef, 1.0), 10);
        assert_eq!(rows.len(), 10);
        assert!(rows.windows(2).all(|w| w[0] <= w[1]));
        assert!(rows.iter().all(|r| *r < 10));
    }

    #[test]
    fn test_without_replacement_half_rate() {
        let rows = select_rows(&opts(SampleMode::WithoutReplacement, 42, 0.5), 10);
        assert_eq!(rows.len(), 5);
        // Strictly ascending implies all distinct.
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
        assert!(rows.iter().all(|r| *r < 10));
    }

    #[test]
    fn test_decimate_selects_strided_rows() {
        let rows = select_rows(&opts(SampleMode::Decimate, 0, 0.1), 100);
        let expected: Vec<usize> = (0..10).map(|k| k * 10).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_decimate_ignores_seed() {
        let a = select_rows(&opts(SampleMode::Decimate, 1, 0.25), 64);
        let b = select_rows(&opts(SampleMode::Decimate, 999, 0.25), 64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_selection_is_deterministic() {
        for mode in [SampleMode::WithReplacement, SampleMode::WithoutReplacement] {
            let a = select_rows(&opts(mode, 1234, 0.5), 100);
            let b = select_rows(&opts(mode, 1234, 0.5), 100);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = select_rows(&opts(SampleMode::WithoutReplacement, 42, 0.5), 100);
        let b = select_rows(&opts(SampleMode::WithoutReplacement, 123, 0.5), 100);
        assert_ne!(a, b);
    }

    #[test]
    fn test_compress_preserves_inner_dims() {
        let input = NdArray::owning(DType::F32, &[3, 4, 20]);
        for (mode, rate) in [
            (SampleMode::WithReplacement, 0.5),
            (SampleMode::WithoutReplacement, 0.5),
            (SampleMode::Decimate, 0.5),
        ] {
            let output = compress(&opts(mode, 7, rate), &input).unwrap();
            assert_eq!(output.dims()[..2], [3, 4]);
            assert_eq!(output.dims()[2], 10);
            assert_eq!(output.total_bytes(), 10 * input.row_size_bytes());
        }
    }

    #[test]
    fn test_compress_copies_row_bytes() {
        // 4 rows of 3 f32s; decimate at 0.5 keeps rows 0 and 2.
        let data: Vec<f32> = (0..12).map(|x| x as f32).collect();
        let input = NdArray::from_f32s(&data, &[3, 4]).unwrap();
        let output = compress(&opts(SampleMode::Decimate, 0, 0.5), &input).unwrap();
        let expected = NdArray::from_f32s(&[0.0, 1.0, 2.0, 6.0, 7.0, 8.0], &[3, 2]).unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_compress_is_byte_deterministic() {
        let data: Vec<f64> = (0..200).map(|x| (x as f64).sin()).collect();
        let input = NdArray::from_f64s(&data, &[2, 100]).unwrap();
        let o = opts(SampleMode::WithReplacement, 2024, 0.3);
        assert_eq!(compress(&o, &input).unwrap(), compress(&o, &input).unwrap());
    }

    #[test]
    fn test_compress_rejects_empty_input() {
        let no_dims = NdArray::owning(DType::F32, &[]);
        let no_rows = NdArray::owning(DType::F32, &[3, 0]);
        let o = opts(SampleMode::Decimate, 0, 0.5);
        assert_eq!(compress(&o, &no_dims).unwrap_err(), SampleError::EmptyInput);
        assert_eq!(compress(&o, &no_rows).unwrap_err(), SampleError::EmptyInput);
    }

    #[test]
    fn test_decompress_is_identity_copy() {
        let data: Vec<f32> = (0..24).map(|x| x as f32 * 0.5).collect();
        let input = NdArray::from_f32s(&data, &[2, 3, 4]).unwrap();
        let output = decompress(&input);
        assert_eq!(output, input);

        // And the reverse of a sampled array is just that sampled array.
        let sampled = compress(&opts(SampleMode::WithoutReplacement, 5, 0.5), &input).unwrap();
        assert_eq!(decompress(&sampled), sampled);
    }
}
