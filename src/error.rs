use thiserror::Error;

use crate::section::SectionId;

pub type Result<T, E = PortfolioError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("no outline registered for section {0}")]
    MissingOutline(SectionId),

    #[error("outline for section {section} is not a valid path: {reason}")]
    InvalidOutline { section: SectionId, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration is not valid JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("host does not provide {0}")]
    MissingCapability(&'static str),

    #[error("unknown section identifier `{0}`")]
    UnknownSection(String),

    #[error("missing page element #{0}")]
    MissingElement(String),
}

#[cfg(target_arch = "wasm32")]
impl From<PortfolioError> for wasm_bindgen::JsValue {
    fn from(err: PortfolioError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
