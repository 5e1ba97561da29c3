/// Default outbound dictionary budget in bytes.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Default inbound dictionary budget in bytes.
pub const DEFAULT_INBOUND_CAPACITY: usize = 256;

/// Buffer sizes of a message channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Maximum encoded size of an outbound dictionary.
    pub outbound_capacity: usize,
    /// Maximum encoded size of an inbound dictionary. Larger ones are dropped.
    pub inbound_capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            inbound_capacity: DEFAULT_INBOUND_CAPACITY,
        }
    }
}
