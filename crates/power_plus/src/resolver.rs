//! Best-effort column resolution against a drifting upstream schema.
//!
//! The metric columns are located by case-insensitive substring match and
//! the **first** match in source order wins. Later plausible candidates are
//! ignored even if they look like a better fit.

use common::ResolutionError;

const BAT_SPEED_NEEDLE: &str = "bat_speed";
const SWING_LENGTH_NEEDLE: &str = "swing_length";

const PLAYER_NAME_ALIASES: &[&str] = &["player_name", "name"];
const TEAM_ALIASES: &[&str] = &["team", "team_abbrev"];
const SWINGS_ALIASES: &[&str] = &["swings", "swings_competitive"];

/// Column indices located in a raw header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub bat_speed: usize,
    pub swing_length: usize,
    pub player_name: Option<usize>,
    pub team: Option<usize>,
    pub swings: Option<usize>,
}

impl ResolvedColumns {
    /// Whether `index` feeds one of the typed record fields.
    pub fn consumes(&self, index: usize) -> bool {
        index == self.bat_speed
            || index == self.swing_length
            || self.player_name == Some(index)
            || self.team == Some(index)
            || self.swings == Some(index)
    }
}

/// Resolve the metric and identity columns of `columns`.
///
/// Fails only when a metric column is missing; identity columns are optional.
pub fn resolve(columns: &[String]) -> Result<ResolvedColumns, ResolutionError> {
    let bat_speed = first_containing(columns, BAT_SPEED_NEEDLE).ok_or_else(|| {
        ResolutionError::MissingColumn {
            which: BAT_SPEED_NEEDLE,
            available: columns.to_vec(),
        }
    })?;
    let swing_length = first_containing(columns, SWING_LENGTH_NEEDLE).ok_or_else(|| {
        ResolutionError::MissingColumn {
            which: SWING_LENGTH_NEEDLE,
            available: columns.to_vec(),
        }
    })?;

    Ok(ResolvedColumns {
        bat_speed,
        swing_length,
        player_name: first_named(columns, PLAYER_NAME_ALIASES),
        team: first_named(columns, TEAM_ALIASES),
        swings: first_named(columns, SWINGS_ALIASES),
    })
}

fn first_containing(columns: &[String], needle: &str) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.to_lowercase().contains(needle))
}

/// First alias (in alias priority order) that names a column exactly.
fn first_named(columns: &[String], aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|alias| {
        columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(alias))
    })
}
