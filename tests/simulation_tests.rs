use game_stats_server::simulation::{parse_profile, plan_run, RandomProfile, StatSubject};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

fn profile(n: &str) -> RandomProfile {
    RandomProfile {
        nickname: n.into(),
        profile_image: format!("https://example.com/{n}.jpg"),
    }
}

#[test]
fn parses_randomuser_payload() {
    let body = json!({
        "results": [{
            "login": { "username": "yellowfrog123" },
            "picture": { "large": "https://randomuser.me/api/portraits/women/1.jpg" }
        }]
    });
    let p = parse_profile(&body).unwrap();
    assert_eq!(p.nickname, "yellowfrog123");
    assert_eq!(
        p.profile_image,
        "https://randomuser.me/api/portraits/women/1.jpg"
    );
}

#[test]
fn rejects_payload_without_results() {
    assert!(parse_profile(&json!({ "results": [] })).is_err());
    assert!(parse_profile(&json!({})).is_err());
}

#[test]
fn rejects_payload_missing_username() {
    let body = json!({
        "results": [{ "picture": { "large": "https://example.com/x.jpg" } }]
    });
    assert!(parse_profile(&body).is_err());
}

#[test]
fn empty_run_still_produces_one_player_one_game_one_stat() {
    let mut rng = StdRng::seed_from_u64(7);
    let plan = plan_run(&mut rng, Vec::new(), profile("fallback"));

    // No participants, no winner, but the stat still gets a fresh player.
    assert!(plan.profiles.is_empty());
    assert!(plan.winner.is_none());
    assert_eq!(plan.stat_subject, StatSubject::Fresh(profile("fallback")));
    // The fresh player is not a participant, so no game link.
    assert!(!plan.link_stat_to_game);
    assert!((0..=100).contains(&plan.stat_score));
}

#[test]
fn populated_run_picks_winner_and_stat_player_from_participants() {
    let mut rng = StdRng::seed_from_u64(42);
    let profiles = vec![profile("a"), profile("b"), profile("c")];
    let plan = plan_run(&mut rng, profiles.clone(), profile("a"));

    assert_eq!(plan.profiles, profiles);
    let winner = plan.winner.expect("populated runs always have a winner");
    assert!(winner < profiles.len());
    match plan.stat_subject {
        StatSubject::Generated(i) => assert!(i < profiles.len()),
        StatSubject::Fresh(_) => panic!("stat player should come from participants"),
    }
    assert!(plan.link_stat_to_game);
    assert!((0..=100).contains(&plan.stat_score));
}

#[test]
fn scores_cover_the_inclusive_range() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..500 {
        let plan = plan_run(&mut rng, vec![profile("a")], profile("a"));
        assert!((0..=100).contains(&plan.stat_score));
    }
}
