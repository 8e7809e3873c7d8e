//! Partial-update bodies distinguish "field absent" (keep) from
//! "field null" (clear).

use game_stats_server::http::games::UpdateGameRequest;
use game_stats_server::http::stats::UpdateStatRequest;
use game_stats_server::http::users::UpdateUserRequest;

#[test]
fn absent_game_fields_mean_keep() {
    let req: UpdateGameRequest = serde_json::from_str("{}").unwrap();
    assert!(req.players.is_none());
    assert!(req.winner.is_none());
    assert!(req.finish_timestamp.is_none());
}

#[test]
fn null_winner_means_clear() {
    let req: UpdateGameRequest = serde_json::from_str(r#"{"winner": null}"#).unwrap();
    assert_eq!(req.winner, Some(None));
}

#[test]
fn explicit_winner_means_set() {
    let body = r#"{"winner": "8c7f2f52-5a2c-4b0a-9a37-6e2d6a1d8f01"}"#;
    let req: UpdateGameRequest = serde_json::from_str(body).unwrap();
    assert!(matches!(req.winner, Some(Some(_))));
}

#[test]
fn null_finish_timestamp_means_clear() {
    let req: UpdateGameRequest =
        serde_json::from_str(r#"{"finish_timestamp": null}"#).unwrap();
    assert_eq!(req.finish_timestamp, Some(None));
}

#[test]
fn null_game_detaches_a_stat() {
    let req: UpdateStatRequest = serde_json::from_str(r#"{"game": null}"#).unwrap();
    assert_eq!(req.game, Some(None));

    let absent: UpdateStatRequest = serde_json::from_str(r#"{"score": 3}"#).unwrap();
    assert!(absent.game.is_none());
    assert_eq!(absent.score, Some(3));
}

#[test]
fn null_email_clears_it() {
    let req: UpdateUserRequest = serde_json::from_str(r#"{"email": null}"#).unwrap();
    assert_eq!(req.email, Some(None));

    let absent: UpdateUserRequest = serde_json::from_str("{}").unwrap();
    assert!(absent.email.is_none());
}
