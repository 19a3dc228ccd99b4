//! The plugin surface an external host sees: a stable name, a semantic
//! version, a typed option surface, a read-only configuration report, and
//! deep-copy cloning.
//!
//! A `SamplePlugin` holds nothing but its validated configuration
//! snapshot, so a shared `&SamplePlugin` is safe to call from many
//! threads at once; every invocation owns its generator and its output.

use crate::data::NdArray;
use crate::options::Options;
use crate::sampling::{self, SampleError, SampleMode, SampleOptions, MODE_NAMES};

pub const MODE_KEY: &str = "sample:mode";
pub const SEED_KEY: &str = "sample:seed";
pub const RATE_KEY: &str = "sample:rate";
pub const THREAD_SAFE_KEY: &str = "sample:thread_safe";
pub const MODES_KEY: &str = "sample:modes";

/// The row-subsampling transform, packaged for a plugin host.
#[derive(Debug, Clone, Default)]
pub struct SamplePlugin {
    opts: SampleOptions,
}

impl SamplePlugin {
    pub fn new() -> SamplePlugin {
        SamplePlugin::default()
    }

    pub fn with_options(opts: SampleOptions) -> SamplePlugin {
        SamplePlugin { opts }
    }

    /// Stable name this transform registers under.
    pub fn prefix(&self) -> &'static str {
        "sample"
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
    pub fn major_version(&self) -> u32 {
        version_part(env!("CARGO_PKG_VERSION_MAJOR"))
    }
    pub fn minor_version(&self) -> u32 {
        version_part(env!("CARGO_PKG_VERSION_MINOR"))
    }
    pub fn patch_version(&self) -> u32 {
        version_part(env!("CARGO_PKG_VERSION_PATCH"))
    }

    /// The current configuration snapshot.
    pub fn sample_options(&self) -> &SampleOptions {
        &self.opts
    }

    /// Settable options as a typed dictionary.
    pub fn options(&self) -> Options {
        let mut out = Options::new();
        out.set_text(MODE_KEY, self.opts.mode.as_str());
        out.set_integer(SEED_KEY, self.opts.seed);
        out.set_real(RATE_KEY, self.opts.rate.into_inner());
        out
    }

    /// Apply recognized keys from `options`. Unrecognized or missing keys
    /// leave the previously-set values unchanged; an invalid mode or rate
    /// is an error and leaves the whole configuration untouched.
    pub fn set_options(&mut self, options: &Options) -> Result<(), SampleError> {
        let mut mode = self.opts.mode;
        let mut seed = self.opts.seed;
        let mut rate = self.opts.rate.into_inner();
        if let Some(name) = options.get_text(MODE_KEY) {
            mode = SampleMode::parse(name)?;
        }
        if let Some(value) = options.get_integer(SEED_KEY) {
            seed = value;
        }
        if let Some(value) = options.get_real(RATE_KEY) {
            rate = value;
        }
        self.opts = SampleOptions::try_new(mode, seed, rate)?;
        Ok(())
    }

    /// Read-only reporting surface: thread-safety level and the supported
    /// mode names.
    pub fn configuration(&self) -> Options {
        let mut out = Options::new();
        out.set_text(THREAD_SAFE_KEY, "multiple");
        out.set_text_list(MODES_KEY, &MODE_NAMES);
        out
    }

    pub fn compress(&self, input: &NdArray) -> Result<NdArray, SampleError> {
        sampling::compress(&self.opts, input)
    }

    pub fn decompress(&self, input: &NdArray) -> NdArray {
        sampling::decompress(input)
    }
}

fn version_part(text: &str) -> u32 {
    text.parse().unwrap_or(0)
}
