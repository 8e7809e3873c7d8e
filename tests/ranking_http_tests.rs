use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use game_stats_server::http::stats::{csv_response, negotiated_format, RankingQuery};
use game_stats_server::report::{rank, ScoreRow};

fn query(format: Option<&str>) -> RankingQuery {
    RankingQuery {
        format: format.map(Into::into),
    }
}

#[test]
fn format_param_wins_over_accept_header() {
    let req = TestRequest::default()
        .insert_header(("Accept", "text/html"))
        .to_http_request();
    assert_eq!(negotiated_format(&req, &query(Some("csv"))), "csv");
    assert_eq!(negotiated_format(&req, &query(Some("JSON"))), "json");
}

#[test]
fn accept_header_selects_html_and_csv() {
    let html = TestRequest::default()
        .insert_header(("Accept", "text/html"))
        .to_http_request();
    assert_eq!(negotiated_format(&html, &query(None)), "html");

    let csv = TestRequest::default()
        .insert_header(("Accept", "text/csv"))
        .to_http_request();
    assert_eq!(negotiated_format(&csv, &query(None)), "csv");
}

#[test]
fn json_is_the_default_format() {
    let plain = TestRequest::default().to_http_request();
    assert_eq!(negotiated_format(&plain, &query(None)), "json");

    let other = TestRequest::default()
        .insert_header(("Accept", "application/json"))
        .to_http_request();
    assert_eq!(negotiated_format(&other, &query(None)), "json");
}

#[actix_rt::test]
async fn csv_response_is_a_named_attachment() {
    let entries = rank(
        &[ScoreRow {
            nickname: "alice".into(),
            score: 42,
        }],
        10,
    );
    let resp = csv_response(&entries).unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "text/csv"
    );
    assert_eq!(
        resp.headers().get("Content-Disposition").unwrap(),
        "attachment; filename=\"top_scores.csv\""
    );

    let body = to_bytes(resp.into_body()).await.unwrap();
    let text = std::str::from_utf8(&body).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Rank,Player,Score"));
    assert_eq!(lines.next(), Some("1,alice,42"));
}
