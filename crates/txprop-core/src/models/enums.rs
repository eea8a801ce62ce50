use serde::{Deserialize, Serialize};

/// How a transactional boundary relates to the scope it is opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Propagation {
    /// Join the caller's transaction, or start one when there is none.
    #[default]
    Required,
    /// Suspend the caller's transaction and start an independent one.
    RequiresNew,
    /// Run inside a savepoint of the caller's transaction.
    Nested,
}

/// What opening a boundary actually does once the caller's state is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopePlan {
    /// Begin a new physical transaction on its own connection.
    Physical,
    /// Reuse the caller's connection and transaction.
    Participant,
    /// Open a savepoint on the caller's connection.
    Savepoint,
}

impl Propagation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::RequiresNew => "requires_new",
            Self::Nested => "nested",
        }
    }

    #[must_use]
    pub const fn plan(self, has_outer: bool) -> ScopePlan {
        match (self, has_outer) {
            (_, false) | (Self::RequiresNew, true) => ScopePlan::Physical,
            (Self::Required, true) => ScopePlan::Participant,
            (Self::Nested, true) => ScopePlan::Savepoint,
        }
    }
}

impl std::fmt::Display for Propagation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Propagation {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "required" => Ok(Self::Required),
            "requires_new" => Ok(Self::RequiresNew),
            "nested" => Ok(Self::Nested),
            _ => Err(EnumParseError::new("propagation", value)),
        }
    }
}

/// How the outer write reaches the inner write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InnerCall {
    /// Through the inner boundary, which opens its own transaction.
    #[default]
    Routed,
    /// Straight into the inner body on the outer connection; the declared
    /// propagation never takes effect.
    Direct,
    /// Through a boundary that joins the outer transaction.
    Joined,
}

impl InnerCall {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Routed => "routed",
            Self::Direct => "direct",
            Self::Joined => "joined",
        }
    }
}

impl std::fmt::Display for InnerCall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InnerCall {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "routed" => Ok(Self::Routed),
            "direct" => Ok(Self::Direct),
            "joined" => Ok(Self::Joined),
            _ => Err(EnumParseError::new("inner_call", value)),
        }
    }
}

#[derive(Debug)]
pub struct EnumParseError {
    enum_name: &'static str,
    value: String,
}

impl EnumParseError {
    fn new(enum_name: &'static str, value: impl Into<String>) -> Self {
        Self {
            enum_name,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value: {}", self.enum_name, self.value)
    }
}

impl std::error::Error for EnumParseError {}
