pub const INCOMING_MESSAGE_SEED: &[u8] = b"incoming_message";
pub const OUTPUT_ROOT_SEED: &[u8] = b"output_root";
pub const ATTESTED_BATCH_SEED: &[u8] = b"attested_batch";
pub const TWIN_SEED: &[u8] = b"twin";
