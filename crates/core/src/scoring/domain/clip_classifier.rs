use std::collections::HashMap;

use ndarray::Array5;

use crate::shared::constants::FINAL_OUTPUT_NAME;

/// Named scalar outputs of one classifier run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifierOutput {
    fields: HashMap<String, f64>,
}

impl ClassifierOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Output holding only the clip score.
    pub fn with_final_output(score: f64) -> Self {
        let mut output = Self::new();
        output.insert(FINAL_OUTPUT_NAME, score);
        output
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.fields.get(name).copied()
    }

    /// The clip score, if the classifier produced one.
    pub fn final_output(&self) -> Option<f64> {
        self.get(FINAL_OUTPUT_NAME)
    }
}

/// Domain interface for the temporal face classifier.
///
/// `batch` has shape `(1, 3, clip_size, height, width)` with pixel values
/// already standardized per channel. Implementations must report a
/// `final_output` field holding the clip score.
pub trait ClipClassifier: Send {
    fn classify(
        &mut self,
        batch: &Array5<f32>,
    ) -> Result<ClassifierOutput, Box<dyn std::error::Error>>;
}
