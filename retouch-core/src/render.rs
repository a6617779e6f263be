pub mod compositor;
pub mod pipeline;
pub mod worker;
