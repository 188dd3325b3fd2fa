use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::mlb_stats::MatchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("schedule fetch failed: {0:#}")]
    Fetch(anyhow::Error),

    #[error(transparent)]
    NotFound(#[from] MatchError),

    #[error("no stored games for {0}")]
    MissingDocument(String),

    #[error("invalid date '{0}', expected MM-DD-YYYY")]
    BadDate(String),

    #[error("failed to encode games: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("store error: {0:#}")]
    Store(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) | AppError::MissingDocument(_) => StatusCode::NOT_FOUND,
            AppError::BadDate(_) => StatusCode::BAD_REQUEST,
            AppError::Encode(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_mapping() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        assert_eq!(
            AppError::from(MatchError::DateNotFound { date }).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Fetch(anyhow::anyhow!("timeout")).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Store(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::BadDate("13-45-2020".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_message_names_date() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let err = AppError::from(MatchError::DateNotFound { date });
        assert_eq!(err.to_string(), "no schedule entry found for 2020-03-01");
    }
}
