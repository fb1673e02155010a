//! CSV export of a standings table.

use crate::models::TeamStats;

/// Header row plus one row per team, in the given order.
pub fn standings_csv(standings: &[TeamStats]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in standings {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    // Every field comes from a Rust String or an integer.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
