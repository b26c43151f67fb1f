//! Model identifier resolution and backend construction.

use std::sync::Arc;

use crate::backend::{AddressParser, BackendError, Device, HeuristicParser};

/// Identifiers of the neural address models. They are recognized so the
/// operator gets a precise error, but no inference runtime ships with the
/// service.
const NEURAL_MODELS: [&str; 8] = [
    "fasttext",
    "fasttext-light",
    "fasttext_attention",
    "bpemb",
    "bpemb_attention",
    "lightest",
    "fastest",
    "best",
];

/// Backend variants selectable through the `model` setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelKind {
    /// Built-in rule-based tagger.
    Heuristic,
    /// Neural model requiring an external inference runtime.
    Neural(String),
}

impl ModelKind {
    pub fn from_identifier(model: &str) -> Result<Self, BackendError> {
        let id = model.trim().to_lowercase();
        match id.as_str() {
            "heuristic" | "rules" => Ok(ModelKind::Heuristic),
            other if NEURAL_MODELS.contains(&other) => Ok(ModelKind::Neural(id)),
            _ => Err(BackendError::UnknownModel(model.to_string())),
        }
    }
}

/// Construct the process-wide parser for `model` placed on `device`.
pub fn build_parser(model: &str, device: Device) -> Result<Arc<dyn AddressParser>, BackendError> {
    match ModelKind::from_identifier(model)? {
        ModelKind::Heuristic => match device {
            Device::Cpu => Ok(Arc::new(HeuristicParser::new())),
            Device::Gpu(_) => Err(BackendError::UnsupportedDevice {
                model: model.to_string(),
                device,
            }),
        },
        ModelKind::Neural(id) => Err(BackendError::RuntimeUnavailable(id)),
    }
}
