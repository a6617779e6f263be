pub mod auto;
pub mod post;
pub mod spatial;
