pub mod execution;
pub mod message;
pub mod relay;
pub mod signatures;
pub mod validators;
