use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("tx_begin_failed: {0}")]
    Begin(String),
    #[error("tx_commit_failed: {0}")]
    Commit(String),
    #[error("tx_rollback_failed: {0}")]
    Rollback(String),
    #[error("unexpected_rollback: transaction {tx_id} was marked rollback-only")]
    UnexpectedRollback { tx_id: Uuid },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("arithmetic: {0}")]
    Arithmetic(&'static str),
    #[error("duplicate_id: {id}")]
    DuplicateId { id: i64 },
    #[error("invalid_rows: {0}")]
    InvalidRows(&'static str),
    #[error("db_error: {0}")]
    Db(String),
    #[error(transparent)]
    Tx(#[from] TxError),
}

impl ServiceError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Arithmetic(_) => "arithmetic",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::InvalidRows(_) => "invalid_rows",
            Self::Db(_) => "db_error",
            Self::Tx(TxError::UnexpectedRollback { .. }) => "unexpected_rollback",
            Self::Tx(_) => "tx_error",
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_errors_convert_into_service_errors() {
        let tx_id = Uuid::now_v7();
        let err: ServiceError = TxError::UnexpectedRollback { tx_id }.into();
        assert_eq!(err.kind(), "unexpected_rollback");
        assert_eq!(
            err.to_string(),
            format!("unexpected_rollback: transaction {tx_id} was marked rollback-only")
        );
    }

    #[test]
    fn duplicate_id_message_names_the_id() {
        let err = ServiceError::DuplicateId { id: 5 };
        assert_eq!(err.to_string(), "duplicate_id: 5");
        assert_eq!(err.kind(), "duplicate_id");
    }
}
