use game_stats_server::config::settings;
use game_stats_server::report::{rank, to_csv, to_html, ScoreRow, CSV_FILENAME};

fn rows() -> Vec<ScoreRow> {
    vec![
        ScoreRow {
            nickname: "alice".into(),
            score: 90,
        },
        ScoreRow {
            nickname: "bob".into(),
            score: 90,
        },
        ScoreRow {
            nickname: "carol".into(),
            score: 12,
        },
    ]
}

#[test]
fn rank_assigns_positions_one_based() {
    let entries = rank(&rows(), 10);
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].player, "alice");
    assert_eq!(entries[1].rank, 2);
    assert_eq!(entries[2].rank, 3);
}

#[test]
fn rank_preserves_non_increasing_score_order() {
    let entries = rank(&rows(), 10);
    for pair in entries.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn rank_caps_output_at_the_limit() {
    let many: Vec<ScoreRow> = (0..11i32)
        .map(|i| ScoreRow {
            nickname: format!("p{i}"),
            score: 100 - i,
        })
        .collect();
    let entries = rank(&many, 10);
    assert_eq!(entries.len(), 10);
    assert_eq!(entries.last().unwrap().rank, 10);
    assert_eq!(entries.last().unwrap().player, "p9");
}

#[test]
fn default_report_limit_is_ten() {
    assert_eq!(settings().ranking_limit, 10);
}

#[test]
fn rank_of_empty_input_is_empty() {
    assert!(rank(&[], 10).is_empty());
}

#[test]
fn csv_has_expected_header_and_rows() {
    let entries = rank(&rows(), 10);
    let bytes = to_csv(&entries).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Rank,Player,Score"));
    assert_eq!(lines.next(), Some("1,alice,90"));
    assert_eq!(lines.next(), Some("2,bob,90"));
    assert_eq!(lines.next(), Some("3,carol,12"));
    assert_eq!(lines.next(), None);
}

#[test]
fn csv_of_empty_report_is_header_only() {
    let text = String::from_utf8(to_csv(&[]).unwrap()).unwrap();
    assert_eq!(text.trim_end(), "Rank,Player,Score");
}

#[test]
fn csv_attachment_filename_is_stable() {
    assert_eq!(CSV_FILENAME, "top_scores.csv");
}

#[test]
fn html_contains_a_row_per_entry() {
    let entries = rank(&rows(), 10);
    let html = to_html(&entries);
    assert!(html.contains("<table>"));
    assert!(html.contains("<tr><th>Rank</th><th>Player</th><th>Score</th></tr>"));
    assert!(html.contains("<tr><td>1</td><td>alice</td><td>90</td></tr>"));
    assert!(html.contains("<tr><td>3</td><td>carol</td><td>12</td></tr>"));
}

#[test]
fn html_escapes_hostile_nicknames() {
    // Nickname validation forbids these, but simulation data is external.
    let entries = rank(
        &[ScoreRow {
            nickname: "<script>".into(),
            score: 1,
        }],
        10,
    );
    let html = to_html(&entries);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}
