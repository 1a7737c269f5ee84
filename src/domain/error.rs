//! Domain error types.

/// Top-level error type for dispotrader.
#[derive(Debug, thiserror::Error)]
pub enum DispoError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("price table is empty: at least one (stock, date, close) row is required")]
    EmptyPriceTable,

    #[error("price data error in {path}: {reason}")]
    PriceData { path: String, reason: String },

    #[error("no readable raw price files in {dir}")]
    NoPriceFiles { dir: String },

    #[error("failed to write {path}: {reason}")]
    Output { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DispoError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        DispoError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        DispoError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            DispoError::ConfigParse { .. }
                | DispoError::ConfigMissing { .. }
                | DispoError::ConfigInvalid { .. }
                | DispoError::EmptyPriceTable
        )
    }
}

impl From<&DispoError> for std::process::ExitCode {
    fn from(err: &DispoError) -> Self {
        let code: u8 = match err {
            DispoError::Io(_) | DispoError::Output { .. } => 1,
            DispoError::ConfigParse { .. }
            | DispoError::ConfigMissing { .. }
            | DispoError::ConfigInvalid { .. }
            | DispoError::EmptyPriceTable => 2,
            DispoError::PriceData { .. } | DispoError::NoPriceFiles { .. } => 3,
        };
        std::process::ExitCode::from(code)
    }
}
