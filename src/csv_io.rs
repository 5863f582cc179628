//! CSV import of participant names and CSV export of a standings table.

use crate::models::{LeagueError, Season, StandingsRow};
use serde::{Deserialize, Serialize};
use std::io;

#[derive(Deserialize)]
struct ParticipantRecord {
    name: String,
}

#[derive(Serialize)]
struct StandingsRecord<'a> {
    position: u32,
    name: &'a str,
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    legs_won: u32,
    legs_lost: u32,
    leg_difference: i64,
    penalty: u32,
    points: i32,
}

/// Read participant names from CSV with a `name` header. Other columns are ignored,
/// blank names skipped.
pub fn import_participants<R: io::Read>(reader: R) -> Result<Vec<String>, LeagueError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut names = Vec::new();
    for record in rdr.deserialize::<ParticipantRecord>() {
        let record = record.map_err(|e| LeagueError::Csv(e.to_string()))?;
        if !record.name.is_empty() {
            names.push(record.name);
        }
    }
    Ok(names)
}

/// Write a standings table as CSV, resolving participant names from the season.
pub fn export_standings<W: io::Write>(
    rows: &[StandingsRow],
    season: &Season,
    writer: W,
) -> Result<(), LeagueError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        let name = season
            .participant(row.participant_id)
            .map(|p| p.name.as_str())
            .ok_or(LeagueError::ParticipantNotFound(row.participant_id))?;
        wtr.serialize(StandingsRecord {
            position: row.final_position,
            name,
            played: row.matches_played,
            won: row.matches_won,
            drawn: row.matches_draw,
            lost: row.matches_lost,
            legs_won: row.legs_won,
            legs_lost: row.legs_lost,
            leg_difference: row.leg_difference(),
            penalty: row.penalty_points,
            points: row.points,
        })
        .map_err(|e| LeagueError::Csv(e.to_string()))?;
    }
    wtr.flush().map_err(|e| LeagueError::Csv(e.to_string()))?;
    Ok(())
}
