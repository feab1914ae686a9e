//! Accepted ranges for caller-supplied input.

use crate::error::BoundsError;

pub const MIN_PLAYER_COUNT: u32 = 1;
pub const MAX_PLAYER_COUNT: u32 = 100;
pub const MIN_OWNER_NAME_LEN: usize = 4;
pub const MAX_OWNER_NAME_LEN: usize = 20;

pub fn validate_player_count(count: u32) -> Result<u32, BoundsError> {
    if (MIN_PLAYER_COUNT..=MAX_PLAYER_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(BoundsError::PlayerCount {
            min: MIN_PLAYER_COUNT,
            max: MAX_PLAYER_COUNT,
            actual: count,
        })
    }
}

/// Length is counted in characters, not bytes.
pub fn validate_owner_name(name: &str) -> Result<&str, BoundsError> {
    let len = name.chars().count();
    if (MIN_OWNER_NAME_LEN..=MAX_OWNER_NAME_LEN).contains(&len) {
        Ok(name)
    } else {
        Err(BoundsError::OwnerName {
            min: MIN_OWNER_NAME_LEN,
            max: MAX_OWNER_NAME_LEN,
            actual: len,
        })
    }
}
