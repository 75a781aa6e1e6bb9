pub mod constants;
pub mod instructions;
pub mod message;
pub mod state;

pub use constants::*;
pub use instructions::*;
pub use message::*;
pub use state::*;
