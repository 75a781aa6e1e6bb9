pub mod prove_message;
pub mod register_messages;
pub mod register_output_root;
pub mod relay_message;

pub use prove_message::*;
pub use register_messages::*;
pub use register_output_root::*;
pub use relay_message::*;
