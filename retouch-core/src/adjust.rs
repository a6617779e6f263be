pub mod color;
pub mod state;
pub mod tone;
