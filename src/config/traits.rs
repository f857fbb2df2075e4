use crate::error::PoleBalanceError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), PoleBalanceError>;
}

/// Shorthand used by the section validators.
pub(crate) fn invalid(section: &str, message: impl Into<String>) -> PoleBalanceError {
    PoleBalanceError::Configuration(format!("[{}] {}", section, message.into()))
}
