use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::ResponseError;
use game_stats_server::http::error::ApiError;
use game_stats_server::validate;

#[actix_rt::test]
async fn validation_maps_to_400_naming_the_field() {
    let err = ApiError::from(validate::nickname("not ok").unwrap_err());
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["field"], "nickname");
    assert!(v["message"].as_str().unwrap().contains("underscores"));
}

#[actix_rt::test]
async fn not_found_maps_to_404() {
    let err = ApiError::NotFound;
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

    let body = to_bytes(err.error_response().into_body()).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["detail"], "Not found.");
}

#[test]
fn permission_and_auth_failures_map_to_403_and_401() {
    assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(
        ApiError::Unauthorized("missing Authorization header").status_code(),
        StatusCode::UNAUTHORIZED
    );
}

#[test]
fn row_not_found_becomes_404() {
    let err = ApiError::from(sqlx::Error::RowNotFound);
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}
