// Build queue model

/// Build queue endpoint response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub queued_count: u32,
}
