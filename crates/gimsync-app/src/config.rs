//! Engine and polling configuration.

use std::time::Duration;

use crate::SnapshotSource;

/// How long an experience drop lives. Matches the UI fade-out animation.
pub const DEFAULT_XP_DROP_TTL: Duration = Duration::from_millis(9600);

/// Hues handed out to players, in roster order.
pub const DEFAULT_PALETTE: [u16; 5] = [330, 100, 230, 170, 40];

/// Hue of the shared-storage pseudo-member, and of players once the palette
/// runs out.
pub const SHARED_HUE: u16 = 0;

/// Delay between full group snapshots.
pub const DEFAULT_GROUP_DATA_INTERVAL: Duration = Duration::from_secs(1);

/// Delay between collection log snapshots.
pub const DEFAULT_COLLECTION_LOG_INTERVAL: Duration = Duration::from_secs(30);

/// Reducer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Experience drops older than this are garbage collected.
    pub xp_drop_ttl: Duration,
    /// Player hues, consumed in roster order.
    pub palette: Vec<u16>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { xp_drop_ttl: DEFAULT_XP_DROP_TTL, palette: DEFAULT_PALETTE.to_vec() }
    }
}

/// Polling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay after a group snapshot fetch completes before the next one.
    pub group_data_interval: Duration,
    /// Delay after a collection log fetch completes before the next one.
    pub collection_log_interval: Duration,
}

impl PollConfig {
    /// Delay between polls of `source`.
    pub fn interval(&self, source: SnapshotSource) -> Duration {
        match source {
            SnapshotSource::GroupData => self.group_data_interval,
            SnapshotSource::CollectionLog => self.collection_log_interval,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            group_data_interval: DEFAULT_GROUP_DATA_INTERVAL,
            collection_log_interval: DEFAULT_COLLECTION_LOG_INTERVAL,
        }
    }
}
