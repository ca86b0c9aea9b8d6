pub mod builder;
pub mod edge;
pub mod model;
pub mod node;

pub use builder::*;
pub use edge::*;
pub use model::*;
pub use node::*;
