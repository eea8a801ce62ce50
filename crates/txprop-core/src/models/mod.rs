mod enums;
mod from_row;
mod structs;

pub use enums::{EnumParseError, InnerCall, Propagation, ScopePlan};
pub use structs::{SequencerRows, User};
