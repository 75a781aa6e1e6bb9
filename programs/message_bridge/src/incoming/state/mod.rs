pub mod attested_batch;
pub mod incoming_message;
pub mod output_root;
pub mod twin;

pub use attested_batch::*;
pub use incoming_message::*;
pub use output_root::*;
pub use twin::*;
