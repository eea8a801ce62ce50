pub mod sequencer;
pub mod table;
