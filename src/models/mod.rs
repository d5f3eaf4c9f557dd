//! Trained artifacts and model inference components

pub mod classifier;
pub mod inference;
pub mod loader;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod scaler;

pub use classifier::{ChurnClassifier, LogisticClassifier};
pub use inference::Scorer;
pub use loader::{ArtifactBundle, ArtifactLoader};
pub use scaler::FeatureScaler;
