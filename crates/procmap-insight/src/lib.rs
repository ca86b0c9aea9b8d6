pub mod artifact;
pub mod pipeline;
pub mod ranker;

pub use artifact::*;
pub use pipeline::*;
pub use ranker::*;
