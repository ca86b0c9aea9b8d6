pub mod condition;
pub mod config_manager;
pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use condition::*;
pub use config_manager::*;
pub use error::*;
pub use session::*;
pub use traits::*;
pub use types::*;
