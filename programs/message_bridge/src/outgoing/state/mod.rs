pub mod message_accumulator;
pub mod outgoing_message;

pub use message_accumulator::*;
pub use outgoing_message::*;
