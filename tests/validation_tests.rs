use chrono::{Duration, Utc};
use game_stats_server::validate;
use uuid::Uuid;

#[test]
fn nickname_with_space_is_rejected() {
    assert!(validate::nickname("bad nickname").is_err());
}

#[test]
fn nickname_with_allowed_charset_is_accepted() {
    assert!(validate::nickname("player_123").is_ok());
    assert!(validate::nickname("ABC").is_ok());
    assert!(validate::nickname("_").is_ok());
}

#[test]
fn empty_nickname_is_rejected() {
    assert!(validate::nickname("").is_err());
}

#[test]
fn non_ascii_nickname_is_rejected() {
    assert!(validate::nickname("jos\u{e9}").is_err());
    assert!(validate::nickname("\u{30d7}\u{30ec}\u{30a4}\u{30e4}\u{30fc}").is_err());
}

#[test]
fn nickname_error_names_the_field() {
    let err = validate::nickname("no way").unwrap_err();
    assert_eq!(err.field, "nickname");
    assert!(err.message.contains("letters, numbers, and underscores"));
}

#[test]
fn username_follows_same_rule() {
    assert!(validate::username("some_user").is_ok());
    assert!(validate::username("invalid username").is_err());
}

#[test]
fn winner_must_be_among_players() {
    let p1 = Uuid::new_v4();
    let p2 = Uuid::new_v4();
    let outsider = Uuid::new_v4();
    let players = vec![p1, p2];

    assert!(validate::winner_in_players(&players, Some(p1)).is_ok());
    assert!(validate::winner_in_players(&players, None).is_ok());

    let err = validate::winner_in_players(&players, Some(outsider)).unwrap_err();
    assert_eq!(err.field, "winner");
    assert_eq!(err.message, "Winner must be included in the players list.");
}

#[test]
fn no_winner_is_fine_even_with_no_players() {
    assert!(validate::winner_in_players(&[], None).is_ok());
}

#[test]
fn stat_player_must_be_in_game() {
    let member = Uuid::new_v4();
    let outsider = Uuid::new_v4();
    let players = vec![member];

    assert!(validate::stat_player_in_game(&players, member).is_ok());

    let err = validate::stat_player_in_game(&players, outsider).unwrap_err();
    assert_eq!(err.field, "player");
}

#[test]
fn finish_must_come_after_start() {
    let start = Utc::now();
    assert!(validate::finish_after_start(start, start + Duration::seconds(1)).is_ok());
    assert!(validate::finish_after_start(start, start).is_err());
    assert!(validate::finish_after_start(start, start - Duration::seconds(1)).is_err());
}

#[test]
fn score_must_be_non_negative() {
    assert!(validate::score(0).is_ok());
    assert!(validate::score(100).is_ok());
    assert!(validate::score(-1).is_err());
}

#[test]
fn profile_image_must_be_a_url() {
    assert!(validate::profile_image("https://example.com/a.jpg").is_ok());
    assert!(validate::profile_image("not a url").is_err());
}
