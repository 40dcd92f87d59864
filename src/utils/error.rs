use crate::domain::model::FailureKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmlakError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    Critical,
}

impl EmlakError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EmlakError::Http(_) | EmlakError::Status { .. } => ErrorCategory::Network,
            EmlakError::Config { .. }
            | EmlakError::InvalidConfigValue { .. } => ErrorCategory::Configuration,
            EmlakError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 對應到表單層的失敗類型（使用者看到的訊息不因此改變）
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            EmlakError::Http(e) if e.is_timeout() => FailureKind::Timeout,
            EmlakError::Http(e) if e.is_decode() => FailureKind::Decode,
            EmlakError::Http(_) | EmlakError::Io(_) => FailureKind::Network,
            EmlakError::Status { status, .. } => FailureKind::Status(*status),
            EmlakError::Config { .. } | EmlakError::InvalidConfigValue { .. } => {
                FailureKind::Network
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EmlakError::Http(_) | EmlakError::Status { .. } => {
                "Sunucuya bağlanılamadı. Lütfen daha sonra tekrar deneyin.".to_string()
            }
            EmlakError::Config { message } => format!("Yapılandırma hatası: {}", message),
            EmlakError::InvalidConfigValue { field, reason, .. } => {
                format!("Geçersiz yapılandırma değeri ({}): {}", field, reason)
            }
            EmlakError::Io(e) => format!("Dosya hatası: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the service base URL and your connection, then retry",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags",
            ErrorCategory::System => "Check file permissions and paths",
        }
    }
}

pub type Result<T> = std::result::Result<T, EmlakError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_maps_to_status_failure() {
        let err = EmlakError::Status {
            status: 503,
            url: "http://localhost/predict".to_string(),
        };
        assert_eq!(err.failure_kind(), FailureKind::Status(503));
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = EmlakError::InvalidConfigValue {
            field: "service.base_url".to_string(),
            value: "ftp://x".to_string(),
            reason: "Unsupported URL scheme: ftp".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("service.base_url"));
    }

    #[test]
    fn test_io_error_is_system_failure() {
        let err = EmlakError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "emlak.toml",
        ));
        assert_eq!(err.category(), ErrorCategory::System);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.failure_kind(), FailureKind::Network);
    }
}
