use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProfitError {
    #[error("Invalid fee definition '{fee_id}': {reason}")]
    InvalidFeeDefinition { fee_id: String, reason: String },

    #[error("Invalid shipping service '{service_id}': {reason}")]
    InvalidShippingDefinition { service_id: String, reason: String },

    #[error("Invalid input for '{field}' (value: '{value}'): {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown seller tier '{tier_id}'")]
    UnknownTier {
        tier_id: String,
        available: Vec<String>,
    },

    #[error("Unknown shipping service '{service_id}'")]
    UnknownShippingService {
        service_id: String,
        available: Vec<String>,
    },

    #[error("Unknown marketplace '{name}'")]
    UnknownMarketplace { name: String, available: Vec<String> },

    #[error("Unknown shipping carrier '{name}'")]
    UnknownCarrier { name: String, available: Vec<String> },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Report formatting error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    Lookup,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProfitError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        ProfitError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ProfitError::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ProfitError::InvalidFeeDefinition { .. }
            | ProfitError::InvalidShippingDefinition { .. }
            | ProfitError::ConfigError { .. }
            | ProfitError::SerializationError(_) => ErrorCategory::Configuration,
            ProfitError::InvalidInput { .. } => ErrorCategory::Validation,
            ProfitError::UnknownTier { .. }
            | ProfitError::UnknownShippingService { .. }
            | ProfitError::UnknownMarketplace { .. }
            | ProfitError::UnknownCarrier { .. } => ErrorCategory::Lookup,
            ProfitError::IoError(_) | ProfitError::CsvError(_) | ProfitError::FormatError(_) => {
                ErrorCategory::System
            }
        }
    }

    /// Validation and lookup failures are recoverable by re-entering input;
    /// broken configuration has to be fixed on disk first.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Lookup => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ProfitError::InvalidInput { field, reason, .. } => {
                format!("Input error in {}: {}", field, reason)
            }
            ProfitError::UnknownTier { tier_id, .. } => {
                format!("Seller tier '{}' does not exist in this marketplace", tier_id)
            }
            ProfitError::UnknownShippingService { service_id, .. } => {
                format!("Shipping service '{}' is not offered by this carrier", service_id)
            }
            ProfitError::UnknownMarketplace { name, .. } => {
                format!("No marketplace named '{}' is configured", name)
            }
            ProfitError::UnknownCarrier { name, .. } => {
                format!("No shipping carrier named '{}' is configured", name)
            }
            ProfitError::InvalidFeeDefinition { .. }
            | ProfitError::InvalidShippingDefinition { .. }
            | ProfitError::ConfigError { .. }
            | ProfitError::SerializationError(_) => {
                format!("The rate configuration could not be used: {}", self)
            }
            ProfitError::IoError(e) => format!("File access failed: {}", e),
            ProfitError::CsvError(e) => format!("Could not write CSV output: {}", e),
            ProfitError::FormatError(e) => format!("Could not format the report: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ProfitError::UnknownTier { available, .. }
            | ProfitError::UnknownShippingService { available, .. }
            | ProfitError::UnknownMarketplace { available, .. }
            | ProfitError::UnknownCarrier { available, .. } => {
                if available.is_empty() {
                    "Nothing is configured; check the data directories".to_string()
                } else {
                    format!("Choose one of: {}", available.join(", "))
                }
            }
            ProfitError::InvalidInput { .. } => {
                "Correct the value and run the calculation again".to_string()
            }
            ProfitError::InvalidFeeDefinition { .. } => {
                "Fix the fee entry in the marketplace JSON file".to_string()
            }
            ProfitError::InvalidShippingDefinition { .. } => {
                "Fix the service entry in the shipping JSON file".to_string()
            }
            ProfitError::ConfigError { .. } | ProfitError::SerializationError(_) => {
                "Check the configuration files for syntax errors".to_string()
            }
            ProfitError::IoError(_) => {
                "Check that the path exists and is readable".to_string()
            }
            ProfitError::CsvError(_) | ProfitError::FormatError(_) => {
                "Try a different output format".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ProfitError>;
