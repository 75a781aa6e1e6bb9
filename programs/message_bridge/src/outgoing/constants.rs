pub const MESSAGE_ACCUMULATOR_SEED: &[u8] = b"message_accumulator";
pub const OUTGOING_MESSAGE_SEED: &[u8] = b"outgoing_message";
