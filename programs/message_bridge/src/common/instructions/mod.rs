pub mod initialize;
pub use initialize::*;

pub mod guardian;
pub use guardian::*;

pub mod config;
pub use config::*;

pub mod validators;
pub use validators::*;
