use tracing::debug;

use crate::{
    country::CountryRegistry,
    error::ValidationError,
    mode::Mode,
    types::{MatchInfo, Player, RawMatchInfo},
};

/// Field-level checks on the `info` block. Checked in order: mode, each
/// player of side 1 then side 2, side sizes, then the start/end times.
pub fn validate_info(
    raw: RawMatchInfo,
    registry: &dyn CountryRegistry,
) -> Result<MatchInfo, ValidationError> {
    let mode = Mode::try_from(raw.mode)?;

    for player in raw.team1.iter().chain(raw.team2.iter()) {
        validate_player(player, registry)?;
    }

    if raw.team1.len() != raw.team2.len() || !(1..=2).contains(&raw.team1.len()) {
        debug!(
            "Rejecting side sizes {} and {}",
            raw.team1.len(),
            raw.team2.len()
        );
        return Err(ValidationError::InvalidTeams);
    }

    let start = raw.start.ok_or(ValidationError::InvalidTimes)?;
    if let Some(end) = raw.end {
        if end <= start {
            return Err(ValidationError::InvalidTimes);
        }
    }

    Ok(MatchInfo {
        mode,
        side1: raw.team1,
        side2: raw.team2,
        start,
        end: raw.end,
        in_progress: false,
    })
}

fn validate_player(player: &Player, registry: &dyn CountryRegistry) -> Result<(), ValidationError> {
    if !registry.is_known(&player.country) {
        debug!("Unknown country code {:?}", player.country);
        return Err(ValidationError::InvalidCountry);
    }
    if player.name.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(())
}
