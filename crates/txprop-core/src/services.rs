use serde::Serialize;

use crate::{InnerCall, ServiceError, ServiceResult};

/// Step the inner write runs after its insert and before its boundary
/// completes.
pub trait FaultInjector: Send + Sync {
    fn after_inner_insert(&self) -> ServiceResult<()>;
}

/// Integer division by zero, surfaced as an arithmetic error.
#[derive(Debug, Clone, Copy, Default)]
pub struct DivideByZero;

impl FaultInjector for DivideByZero {
    fn after_inner_insert(&self) -> ServiceResult<()> {
        let divisor = 0_i32;
        1_i32
            .checked_div(divisor)
            .map(|_| ())
            .ok_or(ServiceError::Arithmetic("division by zero"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoFault;

impl FaultInjector for NoFault {
    fn after_inner_insert(&self) -> ServiceResult<()> {
        Ok(())
    }
}

/// Outcome of a completed outer write. The inner error, when present, was
/// logged and swallowed.
#[derive(Debug, Clone, Serialize)]
pub struct SaveReport {
    pub inner_call: InnerCall,
    pub outer_id: i64,
    pub inner_id: i64,
    #[serde(serialize_with = "serialize_error")]
    pub inner_error: Option<ServiceError>,
}

impl SaveReport {
    #[must_use]
    pub fn inner_failed(&self) -> bool {
        self.inner_error.is_some()
    }
}

fn serialize_error<S>(value: &Option<ServiceError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}
