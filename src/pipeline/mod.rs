//! Classification pipeline.
//!
//! ```text
//!  RawFrame ──▶ resize/normalize ──▶ InferencePort ──▶ top-N ──▶ CategoryMap
//! ```
//!
//! The pipeline is a stateless transformation: it owns the preprocessing
//! and postprocessing contract and drives the inference engine through the
//! [`InferencePort`] trait, never touching engine internals.

pub mod categories;
pub mod image;
pub mod topn;

use log::{debug, warn};

use crate::config::StationConfig;
use crate::error::InferenceError;
use self::categories::{Category, CategoryMap};
use self::image::{RawFrame, resize_bilinear, to_tensor};
use self::topn::TopResult;

// ---------------------------------------------------------------------------
// Inference-engine contract
// ---------------------------------------------------------------------------

/// Element type the engine expects at its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorKind {
    Float32,
    /// Quantized model; input passes through as unsigned 8-bit.
    Quantized,
}

/// Input tensor handed to the engine (row-major HWC).
#[derive(Debug, Clone)]
pub enum InputTensor {
    Float(Vec<f32>),
    Quantized(Vec<u8>),
}

/// Output probability vector read back from the engine.
#[derive(Debug, Clone)]
pub enum OutputTensor {
    Float(Vec<f32>),
    UInt8(Vec<u8>),
    Int8(Vec<i8>),
}

/// The slice of the inference engine the pipeline depends on.
///
/// `load_model` and `allocate` run once at startup; the remaining calls
/// run once per classification cycle.
pub trait InferencePort {
    fn load_model(&mut self, path: &str) -> Result<(), InferenceError>;
    fn allocate(&mut self) -> Result<(), InferenceError>;
    /// Element type the loaded model wants at its input.
    fn input_kind(&self) -> TensorKind;
    fn set_input(&mut self, tensor: InputTensor) -> Result<(), InferenceError>;
    fn invoke(&mut self) -> Result<(), InferenceError>;
    fn output(&self) -> Result<OutputTensor, InferenceError>;
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Result of one classification cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub category: Category,
    pub confidence: f32,
    /// Winning model output index (0 when nothing survived selection).
    pub index: usize,
}

impl Classification {
    /// The result used for every failure path: low confidence, capture
    /// error, engine error.  The station treats them all identically.
    pub const fn unrecognized() -> Self {
        Self {
            category: Category::Unrecognized,
            confidence: 0.0,
            index: 0,
        }
    }
}

/// Deterministic pre/post-processing around the inference engine.
#[derive(Debug, Clone)]
pub struct Classifier {
    input_width: u32,
    input_height: u32,
    threshold: f32,
    max_results: usize,
    map: CategoryMap,
}

impl Classifier {
    pub fn from_config(config: &StationConfig) -> Self {
        Self {
            input_width: config.input_width,
            input_height: config.input_height,
            threshold: config.confidence_threshold,
            max_results: config.max_results,
            map: config.categories.clone(),
        }
    }

    /// Run one frame through preprocess → invoke → select → map.
    ///
    /// Engine failures are reported as errors; an empty selection (nothing
    /// above threshold) is a normal outcome and yields
    /// [`Classification::unrecognized`].
    pub fn classify(
        &self,
        engine: &mut impl InferencePort,
        frame: &RawFrame,
    ) -> Result<Classification, InferenceError> {
        let rgb = frame.clone().into_rgb();
        let resized = resize_bilinear(&rgb, self.input_width, self.input_height);

        match engine.input_kind() {
            TensorKind::Float32 => {
                engine.set_input(InputTensor::Float(to_tensor::<f32>(&resized)))?;
            }
            TensorKind::Quantized => {
                engine.set_input(InputTensor::Quantized(to_tensor::<u8>(&resized)))?;
            }
        }
        engine.invoke()?;

        let top = self.select(&engine.output()?);
        let result = match top.first() {
            None => {
                warn!("classification below confidence threshold, rejecting item");
                Classification::unrecognized()
            }
            Some(best) => Classification {
                category: self.map.category_for(best.index),
                confidence: best.confidence,
                index: best.index,
            },
        };
        debug!(
            "classified index={} confidence={:.3} category={:?}",
            result.index, result.confidence, result.category
        );
        Ok(result)
    }

    fn select(&self, output: &OutputTensor) -> Vec<TopResult> {
        match output {
            OutputTensor::Float(v) => topn::get_top_n(v, |x| x, self.max_results, self.threshold),
            OutputTensor::UInt8(v) => topn::get_top_n(
                v,
                topn::unsigned_confidence,
                self.max_results,
                self.threshold,
            ),
            OutputTensor::Int8(v) => {
                topn::get_top_n(v, topn::signed_confidence, self.max_results, self.threshold)
            }
        }
    }
}
