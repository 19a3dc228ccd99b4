use libc::c_void;

#[macro_use]
extern crate serde_derive;

/// Flat-file (raw or text) array loading and saving.
pub mod arrayio;
/// The dense n-dimensional byte container the sampler operates on.
pub mod data;
pub mod ffi;
/// Contains code for reading and writing compressed files based on their extension.
pub mod io_helper;
pub mod json_api;
pub mod options;
pub mod plugin;
pub mod randutil;
/// Row selection policies and the sampling transform itself.
pub mod sampling;

pub use crate::data::{DType, NdArray};
pub use crate::plugin::SamplePlugin;
pub use crate::sampling::{SampleError, SampleMode, SampleOptions};

/// Error-or-success pair handed across the C boundary; exactly one side is
/// non-null.
#[repr(C)]
pub struct CResult {
    pub error_message: *const c_void,
    pub success: *const c_void,
}

impl Default for CResult {
    fn default() -> Self {
        CResult {
            error_message: std::ptr::null(),
            success: std::ptr::null(),
        }
    }
}

/// Host-side handle to a sampler instance.
pub struct CSampler {
    pub actual: SamplePlugin,
}

/// Host-side handle to an owned array.
pub struct CArray {
    pub actual: NdArray,
}
