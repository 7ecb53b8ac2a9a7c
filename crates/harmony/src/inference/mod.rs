//! Inference engine for field classification.

mod classifier;

pub use classifier::{
    ClassifierConfig, DEFAULT_ENUM_PROPORTION, FieldClassifier, detect_concept_uri,
};
