//! Host-issued commands.

use serde::{Deserialize, Serialize};

/// Largest accepted week offset: bookings open at most two weeks ahead.
pub const MAX_WEEK_OFFSET: u8 = 2;

/// Commands the host shell accepts from its UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    /// Book the five weekdays of the week `week_offset` weeks from now.
    RunBatch { week_offset: u8 },
    /// Toggle the mocked time-of-day in the remote context. Forces a reload
    /// so the preload script takes effect.
    ToggleTimeTravel { active: bool },
    /// Force a full content reload.
    Reload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_tags() {
        let value = serde_json::to_value(HostCommand::RunBatch { week_offset: 1 }).unwrap();
        assert_eq!(value["command"], "run_batch");
        assert_eq!(value["week_offset"], 1);

        let value = serde_json::to_value(HostCommand::Reload).unwrap();
        assert_eq!(value["command"], "reload");
    }
}
