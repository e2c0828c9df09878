/// Default size of the receive buffer, matching the agent's
/// `dogstatsd_buffer_size`. Longer datagrams are reported as invalid.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

pub const EVENT_PREFIX: &str = "_e{";

pub const SERVICE_CHECK_PREFIX: &str = "_sc|";

pub const MESSAGE_SEPARATOR: char = '\n';

pub const FIELD_SEPARATOR: char = '|';

pub const TAG_SEPARATOR: char = ',';
