//! Feature extraction through a frozen pretrained network.

use std::path::PathBuf;

use image::RgbImage;
use tract_onnx::prelude::*;

use crate::error::{Error, Result};
use crate::preprocess;

/// Options controlling model loading and diagnostics.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    /// Path to the ONNX model file.
    pub model: PathBuf,
    /// Graph node to read features from. When set, the graph outputs are
    /// rewired to this node, cutting off the classification head. When
    /// absent the model is assumed to already expose pooled features.
    pub feature_node: Option<String>,
    /// Enable verbose stderr output.
    pub verbose: bool,
    /// Suppress non-error stderr output.
    pub quiet: bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/resnet50.onnx"),
            feature_node: None,
            verbose: false,
            quiet: false,
        }
    }
}

/// A pretrained classifier truncated to its pooled feature output.
///
/// Create once with [`EmbeddingEngine::load()`]; the graph is optimized and
/// its input pinned to a single `1x3x224x224` image at load time. Each
/// invocation of the program loads the model fresh; caching weights across
/// processes is the calling pipeline's concern.
#[derive(Debug)]
pub struct EmbeddingEngine {
    model: TypedRunnableModel<TypedModel>,
}

impl EmbeddingEngine {
    /// Load an ONNX model and prepare it for inference.
    ///
    /// If `feature_node` is set, the graph is truncated at that node so the
    /// forward pass stops at the pooled features instead of the class
    /// logits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModelLoad`] if the file cannot be read, the graph
    /// cannot be parsed, the named node does not exist, or optimization
    /// fails.
    pub fn load(opts: &EmbedOptions) -> Result<Self> {
        let mut graph = tract_onnx::onnx()
            .model_for_path(&opts.model)
            .map_err(Error::ModelLoad)?;

        if let Some(node) = &opts.feature_node {
            graph
                .set_output_names(&[node.as_str()])
                .map_err(Error::ModelLoad)?;
        }

        #[allow(clippy::cast_possible_wrap)]
        let side = preprocess::CROP_SIZE as i32;
        let model = graph
            .with_input_fact(0, f32::fact([1, 3, side, side]).into())
            .map_err(Error::ModelLoad)?
            .into_optimized()
            .map_err(Error::ModelLoad)?
            .into_runnable()
            .map_err(Error::ModelLoad)?;

        Ok(Self { model })
    }

    /// Compute the normalized feature vector for an image.
    ///
    /// Preprocesses with the packaged transform, runs one forward pass,
    /// flattens the output tensor in row-major order, and L2-normalizes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Inference`] if the forward pass fails and
    /// [`Error::EmptyFeatures`] if the model yields an empty or all-zero
    /// tensor.
    pub fn embed(&self, image: &RgbImage) -> Result<Vec<f32>> {
        let input: Tensor = preprocess::to_input_tensor(image).into();

        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(Error::Inference)?;

        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(Error::Inference)?;
        let mut features: Vec<f32> = view.iter().copied().collect();

        if features.is_empty() || features.iter().all(|v| *v == 0.0) {
            return Err(Error::EmptyFeatures);
        }

        l2_normalize(&mut features);
        Ok(features)
    }
}

/// Scale a vector to unit Euclidean length in place.
///
/// A zero vector is left untouched rather than filled with NaNs.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TAG_EMBED_FAILED;

    #[test]
    fn l2_normalize_produces_unit_norm() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn l2_normalize_leaves_zero_vector_untouched() {
        let mut v = vec![0.0_f32; 8];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn l2_normalize_handles_single_element() {
        let mut v = vec![-7.5_f32];
        l2_normalize(&mut v);
        assert!((v[0] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn l2_normalize_preserves_direction() {
        let mut v = vec![1.0, -2.0, 2.0];
        l2_normalize(&mut v);
        assert!(v[0] > 0.0 && v[1] < 0.0 && v[2] > 0.0);
        // Original ratios survive scaling
        assert!((v[2] / v[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn load_missing_model_tags_embed_failed() {
        let opts = EmbedOptions {
            model: PathBuf::from("/nonexistent/model.onnx"),
            ..EmbedOptions::default()
        };
        let err = EmbeddingEngine::load(&opts).unwrap_err();
        assert_eq!(err.tag(), TAG_EMBED_FAILED);
        assert!(matches!(err, Error::ModelLoad(_)));
    }

    #[test]
    fn default_options_have_no_feature_node() {
        let opts = EmbedOptions::default();
        assert!(opts.feature_node.is_none());
        assert!(!opts.verbose);
        assert!(!opts.quiet);
    }
}
