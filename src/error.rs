//! Dashboard Error Types
//!
//! 애플리케이션 전역 에러 타입 정의

use serde::Serialize;
use thiserror::Error;

/// 대시보드 에러
///
/// 데이터 없음/필터 미선택 같은 회복 가능한 상태는 에러가 아니라
/// [`crate::models::Panel`] 의 placeholder 로 표현합니다.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Area not found: {0}")]
    AreaNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),
}

/// 명령 응답용 직렬화 가능한 에러
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl From<DashboardError> for CommandError {
    fn from(error: DashboardError) -> Self {
        let code = match &error {
            DashboardError::Database(_) => "DB_ERROR",
            DashboardError::Io(_) => "IO_ERROR",
            DashboardError::Serialization(_) => "SERIALIZATION_ERROR",
            DashboardError::Config(_) => "CONFIG_ERROR",
            DashboardError::InvalidSelection(_) => "INVALID_SELECTION",
            DashboardError::AreaNotFound(_) => "AREA_NOT_FOUND",
            DashboardError::CategoryNotFound(_) => "CATEGORY_NOT_FOUND",
            DashboardError::Lock(_) => "LOCK_ERROR",
        };

        CommandError {
            code: code.to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

/// 명령 결과 타입
pub type CommandResult<T> = Result<T, CommandError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_codes() {
        let err: CommandError = DashboardError::AreaNotFound(3110001).into();
        assert_eq!(err.code, "AREA_NOT_FOUND");
        assert_eq!(err.message, "Area not found: 3110001");

        let err: CommandError = DashboardError::Lock("poisoned".to_string()).into();
        assert_eq!(err.code, "LOCK_ERROR");
    }

    #[test]
    fn test_rusqlite_error_converts() {
        let err: DashboardError = rusqlite::Error::QueryReturnedNoRows.into();
        let cmd: CommandError = err.into();
        assert_eq!(cmd.code, "DB_ERROR");
        assert!(cmd.to_string().starts_with("[DB_ERROR]"));
    }
}
