pub mod error;
pub mod gateway;
pub mod layout;
pub mod settings;

pub use error::*;
pub use gateway::*;
pub use layout::*;
pub use settings::*;
