#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod errors;
pub mod models;
pub mod services;

pub use crate::errors::*;
pub use crate::models::*;
pub use crate::services::*;
