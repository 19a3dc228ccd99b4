use std::error::Error;

use crate::data::NdArray;
use crate::sampling::{self, SampleMode, SampleOptions};
use rayon::prelude::*;

/// A sampling request as hosts send it: plain JSON scalars, validated on
/// conversion into [`SampleOptions`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRequest {
    pub mode: String,
    pub seed: u64,
    pub rate: f64,
}

impl Default for SampleRequest {
    fn default() -> Self {
        let opts = SampleOptions::default();
        Self {
            mode: opts.mode.as_str().to_owned(),
            seed: opts.seed,
            rate: opts.rate.into_inner(),
        }
    }
}

impl SampleRequest {
    pub fn to_options(&self) -> Result<SampleOptions, Box<dyn Error>> {
        let mode = SampleMode::parse(&self.mode)?;
        Ok(SampleOptions::try_new(mode, self.seed, self.rate)?)
    }
}

/// Validate the request and run the transform on one array.
pub fn do_sample(request: &SampleRequest, input: &NdArray) -> Result<NdArray, Box<dyn Error>> {
    let opts = request.to_options()?;
    Ok(sampling::compress(&opts, input)?)
}

/// Run one request against many independent arrays in parallel.
///
/// Each invocation gets its own configuration copy and its own generator,
/// so results are identical to calling [`do_sample`] on each input in
/// order. The whole batch fails if any input is rejected.
pub fn sample_many(
    request: &SampleRequest,
    inputs: &[NdArray],
) -> Result<Vec<NdArray>, Box<dyn Error>> {
    let opts = request.to_options()?;
    let outputs: Result<Vec<NdArray>, _> = inputs
        .par_iter()
        .map(|input| sampling::compress(&opts, input))
        .collect();
    Ok(outputs?)
}

/// Default request, serialized for host introspection.
pub fn defaults_json() -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string(&SampleRequest::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DType;

    #[test]
    fn test_request_parses_from_json() {
        let request: SampleRequest =
            serde_json::from_str(r#"{"mode": "decimate", "seed": 3, "rate": 0.1}"#).unwrap();
        let opts = request.to_options().unwrap();
        assert_eq!(opts.mode, SampleMode::Decimate);
        assert_eq!(opts.seed, 3);
        assert_eq!(opts.rate.into_inner(), 0.1);
    }

    #[test]
    fn test_bad_requests_are_rejected() {
        let bad_mode = SampleRequest {
            mode: "bogus".to_owned(),
            seed: 0,
            rate: 0.5,
        };
        let message = format!("{}", bad_mode.to_options().unwrap_err());
        assert!(message.contains("bogus"), "{}", message);

        let bad_rate = SampleRequest {
            mode: "decimate".to_owned(),
            seed: 0,
            rate: 0.0,
        };
        assert!(bad_rate.to_options().is_err());
    }

    #[test]
    fn test_do_sample() {
        let request = SampleRequest {
            mode: "without-replacement".to_owned(),
            seed: 42,
            rate: 0.5,
        };
        let input = NdArray::owning(DType::F32, &[4, 10]);
        let output = do_sample(&request, &input).unwrap();
        assert_eq!(output.dims(), &[4, 5]);
    }

    #[test]
    fn test_sample_many_matches_sequential() {
        let request = SampleRequest {
            mode: "with-replacement".to_owned(),
            seed: 99,
            rate: 0.25,
        };
        let inputs: Vec<NdArray> = (1..6)
            .map(|i| {
                let data: Vec<f32> = (0..(8 * i * 4)).map(|x| x as f32).collect();
                NdArray::from_f32s(&data, &[8, i * 4]).unwrap()
            })
            .collect();

        let batched = sample_many(&request, &inputs).unwrap();
        assert_eq!(batched.len(), inputs.len());
        for (input, output) in inputs.iter().zip(batched.iter()) {
            assert_eq!(*output, do_sample(&request, input).unwrap());
        }
    }

    #[test]
    fn test_defaults_json_round_trips() {
        let json = defaults_json().unwrap();
        let request: SampleRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.mode, "without-replacement");
        assert_eq!(request.rate, 1.0);
    }
}
