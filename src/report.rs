//! Top-scores report: projection plus the JSON/HTML/CSV encodings.

use anyhow::Result;
use serde::Serialize;

pub const CSV_FILENAME: &str = "top_scores.csv";

/// One row of the raw top-scores query (nickname + score, best first).
#[derive(Debug, Clone)]
pub struct ScoreRow {
    pub nickname: String,
    pub score: i32,
}

/// One rendered report entry; rank is assigned by output position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankingEntry {
    pub rank: usize,
    pub player: String,
    pub score: i32,
}

/// Projects score rows (assumed sorted by descending score) into at
/// most `limit` ranked entries, 1-based.
pub fn rank(rows: &[ScoreRow], limit: usize) -> Vec<RankingEntry> {
    rows.iter()
        .take(limit)
        .enumerate()
        .map(|(i, row)| RankingEntry {
            rank: i + 1,
            player: row.nickname.clone(),
            score: row.score,
        })
        .collect()
}

/// Encodes the report as CSV with a `Rank,Player,Score` header line.
pub fn to_csv(entries: &[RankingEntry]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Rank", "Player", "Score"])?;
    for e in entries {
        wtr.write_record([e.rank.to_string(), e.player.clone(), e.score.to_string()])?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Renders the report as a minimal standalone HTML table.
pub fn to_html(entries: &[RankingEntry]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head><title>Top Scores</title></head>\n<body>\n\
         <h1>Top Scores</h1>\n<table>\n\
         <tr><th>Rank</th><th>Player</th><th>Score</th></tr>\n",
    );
    for e in entries {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            e.rank,
            escape_html(&e.player),
            e.score
        ));
    }
    out.push_str("</table>\n</body>\n</html>\n");
    out
}
