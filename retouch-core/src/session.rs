pub mod engine;
pub mod history;
pub mod opts;
pub mod store;
