/// Temporal clip classifier backed by an ONNX Runtime session.
///
/// The model takes one `(1, 3, T, H, W)` float tensor and reports the clip
/// score in an output named `final_output`. Models exporting a single
/// unnamed output are accepted too.
use std::path::Path;

use ndarray::Array5;

use crate::scoring::domain::clip_classifier::{ClassifierOutput, ClipClassifier};
use crate::shared::constants::FINAL_OUTPUT_NAME;

pub struct OnnxClipClassifier {
    session: ort::session::Session,
    output_index: usize,
}

impl OnnxClipClassifier {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_execution_providers(preferred_execution_providers())?
            .commit_from_file(model_path)?;

        let names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();
        let output_index = score_output_index(&names).ok_or_else(|| {
            format!(
                "model {} has no '{FINAL_OUTPUT_NAME}' output (outputs: {names:?})",
                model_path.display()
            )
        })?;

        log::info!(
            "Loaded clip classifier from {} (score output '{}')",
            model_path.display(),
            names[output_index]
        );
        Ok(Self {
            session,
            output_index,
        })
    }
}

impl ClipClassifier for OnnxClipClassifier {
    fn classify(
        &mut self,
        batch: &Array5<f32>,
    ) -> Result<ClassifierOutput, Box<dyn std::error::Error>> {
        let input_value = ort::value::Tensor::from_array(batch.clone())?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() <= self.output_index {
            return Err("classifier produced fewer outputs than its signature".into());
        }
        let tensor = outputs[self.output_index].try_extract_array::<f32>()?;
        let score = scalar(tensor.iter().copied())?;
        Ok(ClassifierOutput::with_final_output(score))
    }
}

/// Platform execution providers; ONNX Runtime falls back to CPU when
/// none of them load.
fn preferred_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    {
        vec![ort::execution_providers::CoreMLExecutionProvider::default().build()]
    }
    #[cfg(target_os = "windows")]
    {
        vec![ort::execution_providers::DirectMLExecutionProvider::default().build()]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        vec![]
    }
}

/// Index of the score output: the one named `final_output`, else the only one.
fn score_output_index(names: &[String]) -> Option<usize> {
    names
        .iter()
        .position(|name| name == FINAL_OUTPUT_NAME)
        .or(if names.len() == 1 { Some(0) } else { None })
}

/// The single value of a score tensor, as `f64`.
fn scalar(values: impl Iterator<Item = f32>) -> Result<f64, String> {
    let values: Vec<f32> = values.collect();
    match values.as_slice() {
        [value] => Ok(*value as f64),
        [] => Err("score output is empty".to_string()),
        many => Err(format!("score output has {} values, expected 1", many.len())),
    }
}
