use game_stats_server::http::pagination::{envelope, PageParams};

#[test]
fn defaults_to_first_page_of_ten() {
    let page = PageParams::default().resolve();
    assert_eq!(page.number, 1);
    assert_eq!(page.size, 10);
    assert_eq!(page.limit(), 10);
    assert_eq!(page.offset(), 0);
}

#[test]
fn page_size_is_capped_at_one_hundred() {
    let page = PageParams {
        page: Some(2),
        page_size: Some(5000),
    }
    .resolve();
    assert_eq!(page.size, 100);
    assert_eq!(page.offset(), 100);
}

#[test]
fn zero_page_is_clamped_to_one() {
    let page = PageParams {
        page: Some(0),
        page_size: Some(0),
    }
    .resolve();
    assert_eq!(page.number, 1);
    assert_eq!(page.size, 1);
}

#[test]
fn envelope_links_middle_page_both_ways() {
    let page = PageParams {
        page: Some(2),
        page_size: Some(10),
    }
    .resolve();
    let out = envelope("/api/players", page, 25, vec![0u8; 10]);
    assert_eq!(out.count, 25);
    assert_eq!(
        out.next.as_deref(),
        Some("/api/players?page=3&page_size=10")
    );
    assert_eq!(
        out.previous.as_deref(),
        Some("/api/players?page=1&page_size=10")
    );
}

#[test]
fn envelope_first_page_has_no_previous() {
    let page = PageParams::default().resolve();
    let out = envelope("/api/stats", page, 11, vec![0u8; 10]);
    assert!(out.previous.is_none());
    assert_eq!(out.next.as_deref(), Some("/api/stats?page=2&page_size=10"));
}

#[test]
fn envelope_last_page_has_no_next() {
    let page = PageParams {
        page: Some(3),
        page_size: Some(10),
    }
    .resolve();
    let out = envelope("/api/stats", page, 25, vec![0u8; 5]);
    assert!(out.next.is_none());
    assert_eq!(
        out.previous.as_deref(),
        Some("/api/stats?page=2&page_size=10")
    );
}

#[test]
fn envelope_exact_fit_has_no_next() {
    let page = PageParams {
        page: Some(2),
        page_size: Some(10),
    }
    .resolve();
    let out = envelope("/api/games", page, 20, vec![0u8; 10]);
    assert!(out.next.is_none());
}
