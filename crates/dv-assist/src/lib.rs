//! Suggestion service integration for DevVault create views.

pub mod autofill;
pub mod classifier;
pub mod error;

pub use autofill::{Autofill, AutofillEvent};
pub use classifier::{
    parse_classification, parse_envelope, ClassificationRequest, Classifier, GeminiClassifier,
};
pub use error::{AssistError, AssistResult};
