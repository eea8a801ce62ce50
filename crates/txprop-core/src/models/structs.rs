use serde::{Deserialize, Serialize};

use crate::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    #[must_use]
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Rows written by the outer and the inner operation of the sequencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerRows {
    pub outer: User,
    pub inner: User,
}

impl Default for SequencerRows {
    fn default() -> Self {
        Self {
            outer: User::new(5, "Jack5"),
            inner: User::new(6, "Jack6"),
        }
    }
}

impl SequencerRows {
    /// Colliding ids would surface a uniqueness violation instead of the
    /// inner operation's own failure.
    pub fn validate(&self) -> ServiceResult<()> {
        if self.outer.id == self.inner.id {
            return Err(ServiceError::InvalidRows("outer and inner ids must differ"));
        }
        if self.outer.name.trim().is_empty() || self.inner.name.trim().is_empty() {
            return Err(ServiceError::InvalidRows("names must not be empty"));
        }
        Ok(())
    }
}
