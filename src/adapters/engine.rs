//! Null inference engine.
//!
//! Reports every item as unrecognized by emitting an all-zero probability
//! vector.  Useful when the station runs without a model backend —
//! mechanical bring-up, link soak tests — while keeping the full cycle
//! (capture, actuation, display) exercised end to end.

use log::warn;

use crate::app::ports::{InferencePort, InputTensor, OutputTensor, TensorKind};
use crate::error::InferenceError;

/// Output vector length reported by the null engine.  Matches the
/// deployed ten-class model so the category map stays meaningful.
const NULL_OUTPUT_SIZE: usize = 10;

/// An engine that never recognizes anything.
pub struct NullEngine {
    allocated: bool,
}

impl NullEngine {
    pub fn new() -> Self {
        Self { allocated: false }
    }
}

impl InferencePort for NullEngine {
    fn load_model(&mut self, path: &str) -> Result<(), InferenceError> {
        warn!("null engine active — ignoring model '{path}', every item will be rejected");
        Ok(())
    }

    fn allocate(&mut self) -> Result<(), InferenceError> {
        self.allocated = true;
        Ok(())
    }

    fn input_kind(&self) -> TensorKind {
        TensorKind::Float32
    }

    fn set_input(&mut self, _tensor: InputTensor) -> Result<(), InferenceError> {
        if self.allocated {
            Ok(())
        } else {
            Err(InferenceError::AllocateFailed)
        }
    }

    fn invoke(&mut self) -> Result<(), InferenceError> {
        Ok(())
    }

    fn output(&self) -> Result<OutputTensor, InferenceError> {
        Ok(OutputTensor::Float(vec![0.0; NULL_OUTPUT_SIZE]))
    }
}
