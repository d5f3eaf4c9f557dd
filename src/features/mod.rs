//! Feature preparation: categorical encoding and column assembly.
//!
//! Both stages must reproduce the training-time preprocessing exactly.

pub mod assembler;
pub mod encoder;

pub use assembler::FeatureAssembler;
pub use encoder::{CategoricalEncoder, EncodedRecord, EncodedValue, Vocabulary};
