//! What a seat can infer about hidden hands.
//!
//! - `knowledge`: suits each seat is known to be out of.
//! - `sampler`: hypothetical deals consistent with that knowledge.

mod knowledge;
mod sampler;

pub use knowledge::{SuitKnowledge, SuitMask};
pub use sampler::{
    DEFAULT_MAX_ATTEMPTS, HandSampler, SampleRequest, SampledHands, SamplingError, SamplingStats,
};
