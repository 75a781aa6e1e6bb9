pub mod internal;

pub mod constants;
pub mod instructions;
pub mod ix;
pub mod state;

pub use constants::*;
pub use instructions::*;
pub use ix::*;
pub use state::*;
