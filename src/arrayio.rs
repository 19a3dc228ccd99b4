//! Flat-file loading and saving for dense arrays: raw little-endian bytes,
//! or whitespace-separated numeric text. Both go through
//! [`crate::io_helper`], so compressed paths work transparently.
//!
//! This is deliberately shape-blind storage: the caller declares the
//! dtype and dimensions, and we check that the file agrees.

use crate::data::{DType, NdArray};
use crate::io_helper;
use std::error::Error;
use std::io::{BufRead, Read, Write};

/// Read exactly the bytes the declared shape calls for.
pub fn load_raw(path: &str, dtype: DType, dims: &[usize]) -> Result<NdArray, Box<dyn Error>> {
    let mut reader = io_helper::open_reader(path)?;
    let expected = dims.iter().product::<usize>() * dtype.size_bytes();
    let mut bytes = Vec::with_capacity(expected);
    reader.read_to_end(&mut bytes)?;
    if bytes.len() != expected {
        Err(format!(
            "{}: expected {} bytes for {} array of dims {:?}, found {}",
            path,
            expected,
            dtype,
            dims,
            bytes.len()
        ))?;
    }
    Ok(NdArray::from_bytes(dtype, dims.to_vec(), bytes)?)
}

/// Parse whitespace-separated numerals into an `f32` or `f64` array.
pub fn load_text(path: &str, dtype: DType, dims: &[usize]) -> Result<NdArray, Box<dyn Error>> {
    if dtype != DType::F32 && dtype != DType::F64 {
        Err(format!("Text input supports f32 and f64, not {}", dtype))?;
    }
    let reader = io_helper::open_reader(path)?;
    let expected = dims.iter().product::<usize>();
    let mut bytes: Vec<u8> = Vec::with_capacity(expected * dtype.size_bytes());
    let mut count = 0;

    let mut lines = reader.lines();
    let mut num = 0;
    while let Some(line) = lines.next() {
        num += 1;
        let line = line.map_err(|e| format!("{}:{}: {}", path, num, e))?;
        for tok in line.split_whitespace() {
            match dtype {
                DType::F32 => {
                    let value: f32 = fast_float::parse(tok)
                        .map_err(|_| format!("{}:{}: Not a float: {}", path, num, tok))?;
                    bytes.extend_from_slice(&value.to_le_bytes());
                }
                _ => {
                    let value: f64 = fast_float::parse(tok)
                        .map_err(|_| format!("{}:{}: Not a float: {}", path, num, tok))?;
                    bytes.extend_from_slice(&value.to_le_bytes());
                }
            }
            count += 1;
        }
    }

    if count != expected {
        Err(format!(
            "{}: expected {} values for dims {:?}, found {}",
            path, expected, dims, count
        ))?;
    }
    Ok(NdArray::from_bytes(dtype, dims.to_vec(), bytes)?)
}

/// Write the raw bytes of an array; shape metadata is the caller's problem.
pub fn save_raw(array: &NdArray, path: &str) -> Result<(), Box<dyn Error>> {
    let mut writer = io_helper::open_writer(path)?;
    writer.write_all(array.bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> String {
        let mut path = std::env::temp_dir();
        path.push(format!("rowsample_test_{}_{}", std::process::id(), name));
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_raw_round_trip() {
        let path = temp_path("round_trip.bin");
        let data: Vec<f32> = (0..12).map(|x| x as f32).collect();
        let array = NdArray::from_f32s(&data, &[3, 4]).unwrap();
        save_raw(&array, &path).unwrap();
        let back = load_raw(&path, DType::F32, &[3, 4]).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(back, array);
    }

    #[test]
    fn test_raw_round_trip_gz() {
        let path = temp_path("round_trip.bin.gz");
        let data: Vec<f64> = (0..30).map(|x| x as f64 * 1.5).collect();
        let array = NdArray::from_f64s(&data, &[5, 6]).unwrap();
        save_raw(&array, &path).unwrap();
        let back = load_raw(&path, DType::F64, &[5, 6]).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(back, array);
    }

    #[test]
    fn test_raw_length_mismatch() {
        let path = temp_path("short.bin");
        fs::write(&path, [0u8; 10]).unwrap();
        let err = load_raw(&path, DType::F32, &[3, 4]).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(format!("{}", err).contains("expected 48 bytes"));
    }

    #[test]
    fn test_text_load() {
        let path = temp_path("values.txt");
        fs::write(&path, "0 1 2\n3 4 5\n6 7 8 9 10 11\n").unwrap();
        let array = load_text(&path, DType::F32, &[3, 4]).unwrap();
        let _ = fs::remove_file(&path);
        let expected: Vec<f32> = (0..12).map(|x| x as f32).collect();
        assert_eq!(array, NdArray::from_f32s(&expected, &[3, 4]).unwrap());
    }

    #[test]
    fn test_text_load_errors() {
        let path = temp_path("bad.txt");
        fs::write(&path, "1.0 2.0 pelican\n").unwrap();
        let err = load_text(&path, DType::F64, &[3]).unwrap_err();
        assert!(format!("{}", err).contains("pelican"));

        fs::write(&path, "1.0 2.0\n").unwrap();
        let err = load_text(&path, DType::F64, &[3]).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(format!("{}", err).contains("expected 3 values"));

        let err = load_text("unused.txt", DType::I32, &[3]).unwrap_err();
        assert!(format!("{}", err).contains("i32"));
    }
}
