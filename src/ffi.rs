//! C boundary for plugin hosts. Handles (`CSampler`, `CArray`, `CResult`)
//! are defined in the crate root; everything crossing this boundary is
//! either an opaque handle, a JSON string, or raw array bytes.
//!
//! Errors are serialized as `{"error": ..., "context": ...}` JSON and
//! never panic across the boundary.

use libc::{c_char, c_void};
use serde_json;
use std::error::Error;
use std::ffi::CStr;
use std::ffi::CString;
use std::slice;

use crate::data::DType;
use crate::data::NdArray;
use crate::json_api::{self, SampleRequest};
use crate::options::Options;
use crate::plugin::{SamplePlugin, MODE_KEY, RATE_KEY, SEED_KEY};
use crate::sampling::MODE_NAMES;
use crate::{CArray, CResult, CSampler};

/// This is a JSON-API, not a C-API, really.
#[derive(Serialize, Deserialize)]
struct ErrorMessage {
    error: String,
    context: String,
}

/// Accept a string parameter!
pub(crate) fn accept_str(name: &str, input: *const c_void) -> Result<&str, Box<dyn Error>> {
    if input.is_null() {
        Err(format!("NULL pointer: {}", name))?;
    }
    let input: &CStr = unsafe { CStr::from_ptr(input as *const c_char) };
    Ok(input
        .to_str()
        .map_err(|_| format!("Could not parse {} pointer as UTF-8 string!", name))?)
}

/// Internal helper: convert string reference to a heap pointer owned by the host.
pub(crate) fn return_string(output: &str) -> *const c_void {
    let c_output: CString = CString::new(output).expect("Conversion to CString should succeed!");
    CString::into_raw(c_output) as *const c_void
}

pub(crate) fn result_to_json(rust_result: Result<String, Box<dyn Error>>) -> *const c_void {
    let output = match rust_result {
        Ok(response) => response,
        Err(e) => serde_json::to_string(&ErrorMessage {
            error: "error".to_string(),
            context: format!("{:?}", e),
        })
        .expect("Error serialization should succeed."),
    };
    return_string(&output)
}

pub(crate) fn result_to_c<T>(rust_result: Result<T, Box<dyn Error>>) -> *const CResult {
    let mut c_result = Box::new(CResult::default());
    match rust_result {
        Ok(item) => {
            let output = Box::new(item);
            c_result.success = Box::into_raw(output) as *const c_void;
        }
        Err(e) => {
            let error_message = serde_json::to_string(&ErrorMessage {
                error: "error".to_string(),
                context: format!("{:?}", e),
            })
            .expect("Error serialization should succeed.");
            c_result.error_message = return_string(&error_message);
        }
    };
    Box::into_raw(c_result)
}

/// Free a string allocated on this side of the boundary.
#[no_mangle]
pub extern "C" fn rowsample_free_str(originally_from_rust: *mut c_void) {
    if originally_from_rust.is_null() {
        return;
    }
    let _will_drop: CString = unsafe { CString::from_raw(originally_from_rust as *mut c_char) };
}

/// Free a result shell and its error message. The success payload is
/// typed; release it with the matching `rowsample_*_free` call.
#[no_mangle]
pub extern "C" fn rowsample_free_result(result: *mut CResult) {
    if result.is_null() {
        return;
    }
    let result = unsafe { Box::from_raw(result) };
    if !result.error_message.is_null() {
        let _will_drop: CString =
            unsafe { CString::from_raw(result.error_message as *mut c_char) };
    }
}

#[no_mangle]
pub extern "C" fn rowsample_create() -> *mut CSampler {
    Box::into_raw(Box::new(CSampler {
        actual: SamplePlugin::new(),
    }))
}

/// Deep copy: the clone's configuration is fully independent.
#[no_mangle]
pub extern "C" fn rowsample_clone_sampler(sampler: Option<&CSampler>) -> *mut CSampler {
    match sampler {
        Some(s) => Box::into_raw(Box::new(CSampler {
            actual: s.actual.clone(),
        })),
        None => std::ptr::null_mut(),
    }
}

#[no_mangle]
pub extern "C" fn rowsample_free_sampler(sampler: *mut CSampler) {
    if sampler.is_null() {
        return;
    }
    let _will_drop = unsafe { Box::from_raw(sampler) };
}

/// Handle-free introspection queries.
#[no_mangle]
pub extern "C" fn rowsample_exec_json(query_str: *const c_void) -> *const c_void {
    result_to_json(result_exec_json(accept_str("query_str", query_str)))
}

pub(crate) fn result_exec_json(
    query_str: Result<&str, Box<dyn Error>>,
) -> Result<String, Box<dyn Error>> {
    let response = match query_str? {
        "defaults" => json_api::defaults_json()?,
        "modes" => serde_json::to_string(&MODE_NAMES)?,
        "version" => serde_json::to_string(SamplePlugin::new().version())?,
        other => serde_json::to_string(&ErrorMessage {
            error: "unknown_query_str".to_owned(),
            context: other.to_owned(),
        })?,
    };
    Ok(response)
}

/// Apply `{mode, seed, rate}` fields from JSON; absent fields keep their
/// configured values. Returns the resulting options as JSON.
#[no_mangle]
pub extern "C" fn rowsample_set_options_json(
    sampler: Option<&mut CSampler>,
    options_json: *const c_void,
) -> *const c_void {
    result_to_json(result_set_options(
        sampler,
        accept_str("options_json", options_json),
    ))
}

pub(crate) fn result_set_options(
    sampler: Option<&mut CSampler>,
    options_json: Result<&str, Box<dyn Error>>,
) -> Result<String, Box<dyn Error>> {
    let sampler = match sampler {
        Some(s) => s,
        None => Err("Sampler pointer is null!")?,
    };
    let args: serde_json::Value = serde_json::from_str(options_json?)?;
    let mut opts = Options::new();
    if let Some(mode) = args.get("mode").and_then(|v| v.as_str()) {
        opts.set_text(MODE_KEY, mode);
    }
    if let Some(seed) = args.get("seed").and_then(|v| v.as_u64()) {
        opts.set_integer(SEED_KEY, seed);
    }
    if let Some(rate) = args.get("rate").and_then(|v| v.as_f64()) {
        opts.set_real(RATE_KEY, rate);
    }
    sampler.actual.set_options(&opts)?;
    Ok(serde_json::to_string(&current_request(&sampler.actual))?)
}

#[no_mangle]
pub extern "C" fn rowsample_query_json(
    sampler: Option<&CSampler>,
    query_str: *const c_void,
) -> *const c_void {
    result_to_json(result_query_json(sampler, accept_str("query_str", query_str)))
}

pub(crate) fn result_query_json(
    sampler: Option<&CSampler>,
    query_str: Result<&str, Box<dyn Error>>,
) -> Result<String, Box<dyn Error>> {
    let sampler = match sampler {
        Some(s) => s,
        None => Err("Sampler pointer is null!")?,
    };
    let response = match query_str? {
        "options" => serde_json::to_string(&current_request(&sampler.actual))?,
        "configuration" => serde_json::to_string(&sampler.actual.configuration())?,
        "prefix" => serde_json::to_string(sampler.actual.prefix())?,
        other => serde_json::to_string(&ErrorMessage {
            error: "unknown_query_str".to_owned(),
            context: other.to_owned(),
        })?,
    };
    Ok(response)
}

fn current_request(plugin: &SamplePlugin) -> SampleRequest {
    let opts = plugin.sample_options();
    SampleRequest {
        mode: opts.mode.as_str().to_owned(),
        seed: opts.seed,
        rate: opts.rate.into_inner(),
    }
}

/// Copy raw parts into an owned array. A null `data` pointer produces a
/// zero-initialized array.
#[no_mangle]
pub extern "C" fn rowsample_array_create(
    dtype_tag: u32,
    dims: *const u64,
    ndims: usize,
    data: *const c_void,
) -> *const CResult {
    result_to_c(result_array_create(dtype_tag, dims, ndims, data))
}

pub(crate) fn result_array_create(
    dtype_tag: u32,
    dims: *const u64,
    ndims: usize,
    data: *const c_void,
) -> Result<CArray, Box<dyn Error>> {
    let dtype =
        DType::from_tag(dtype_tag).ok_or_else(|| format!("Unknown dtype tag: {}", dtype_tag))?;
    if dims.is_null() {
        Err("dims pointer is null!")?;
    }
    let dims: Vec<usize> = unsafe { slice::from_raw_parts(dims, ndims) }
        .iter()
        .map(|d| *d as usize)
        .collect();
    let n_bytes = dims.iter().product::<usize>() * dtype.size_bytes();
    let bytes = if data.is_null() {
        vec![0u8; n_bytes]
    } else {
        unsafe { slice::from_raw_parts(data as *const u8, n_bytes) }.to_vec()
    };
    Ok(CArray {
        actual: NdArray::from_bytes(dtype, dims, bytes)?,
    })
}

#[no_mangle]
pub extern "C" fn rowsample_array_free(array: *mut CArray) {
    if array.is_null() {
        return;
    }
    let _will_drop = unsafe { Box::from_raw(array) };
}

#[no_mangle]
pub extern "C" fn rowsample_array_dtype(array: Option<&CArray>) -> u32 {
    match array {
        Some(a) => a.actual.dtype().to_tag(),
        None => u32::MAX,
    }
}

#[no_mangle]
pub extern "C" fn rowsample_array_num_dimensions(array: Option<&CArray>) -> u64 {
    match array {
        Some(a) => a.actual.dims().len() as u64,
        None => 0,
    }
}

#[no_mangle]
pub extern "C" fn rowsample_array_get_dimension(array: Option<&CArray>, index: u64) -> u64 {
    match array {
        Some(a) => a.actual.dims().get(index as usize).cloned().unwrap_or(0) as u64,
        None => 0,
    }
}

#[no_mangle]
pub extern "C" fn rowsample_array_num_bytes(array: Option<&CArray>) -> u64 {
    match array {
        Some(a) => a.actual.total_bytes() as u64,
        None => 0,
    }
}

#[no_mangle]
pub extern "C" fn rowsample_array_data(array: Option<&CArray>) -> *const c_void {
    match array {
        Some(a) => a.actual.bytes().as_ptr() as *const c_void,
        None => std::ptr::null(),
    }
}

#[no_mangle]
pub extern "C" fn rowsample_compress(
    sampler: Option<&CSampler>,
    input: Option<&CArray>,
) -> *const CResult {
    result_to_c(result_compress(sampler, input))
}

pub(crate) fn result_compress(
    sampler: Option<&CSampler>,
    input: Option<&CArray>,
) -> Result<CArray, Box<dyn Error>> {
    let sampler = match sampler {
        Some(s) => s,
        None => Err("Sampler pointer is null!")?,
    };
    let input = match input {
        Some(a) => a,
        None => Err("Array pointer is null!")?,
    };
    Ok(CArray {
        actual: sampler.actual.compress(&input.actual)?,
    })
}

#[no_mangle]
pub extern "C" fn rowsample_decompress(
    sampler: Option<&CSampler>,
    input: Option<&CArray>,
) -> *const CResult {
    result_to_c(result_decompress(sampler, input))
}

pub(crate) fn result_decompress(
    sampler: Option<&CSampler>,
    input: Option<&CArray>,
) -> Result<CArray, Box<dyn Error>> {
    let sampler = match sampler {
        Some(s) => s,
        None => Err("Sampler pointer is null!")?,
    };
    let input = match input {
        Some(a) => a,
        None => Err("Array pointer is null!")?,
    };
    Ok(CArray {
        actual: sampler.actual.decompress(&input.actual),
    })
}
