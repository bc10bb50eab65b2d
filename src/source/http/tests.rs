use super::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source(server: &MockServer) -> HttpProfileSource {
    HttpProfileSource::new(
        &server.uri(),
        Some("secret".to_string()),
        Duration::from_secs(5),
    )
}

fn natgeo() -> UserRef {
    UserRef {
        pk: 787132,
        username: "natgeo".into(),
        full_name: None,
    }
}

#[tokio::test]
async fn test_search_sends_query_and_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search"))
        .and(query_param("q", "natgeo"))
        .and(query_param("limit", "5"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"pk": "787132", "username": "natgeo", "full_name": "National Geographic"},
            {"pk": 1, "username": "natgeotravel"}
        ])))
        .mount(&server)
        .await;

    let users = source(&server).search_users("natgeo", 5).await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].pk, 787132);
    assert_eq!(users[0].full_name.as_deref(), Some("National Geographic"));
}

#[tokio::test]
async fn test_search_truncates_to_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"pk": 1, "username": "a"},
            {"pk": 2, "username": "b"},
            {"pk": 3, "username": "c"}
        ])))
        .mount(&server)
        .await;

    let users = source(&server).search_users("x", 1).await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn test_search_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = source(&server).search_users("natgeo", 5).await.unwrap_err();
    assert!(matches!(err, LookoutError::Source(ref m) if m.contains("429")));
}

#[tokio::test]
async fn test_user_info_not_found_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/787132"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert!(source(&server).user_info(&natgeo()).await.is_none());
}

#[tokio::test]
async fn test_user_info_decodes_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/787132"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pk": 787132,
            "username": "natgeo",
            "follower_count": 280000000u64,
            "is_verified": true,
            "profile_pic_url_hd": "https://cdn.example.com/hd.jpg"
        })))
        .mount(&server)
        .await;

    let info = source(&server).user_info(&natgeo()).await.unwrap();
    assert!(info.is_verified);
    assert!(!info.is_private);
    assert_eq!(info.follower_count, Some(280_000_000));
    assert_eq!(info.best_picture(), Some("https://cdn.example.com/hd.jpg"));
}

#[tokio::test]
async fn test_media_passes_amount_and_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/787132/medias"))
        .and(query_param("amount", "80"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"pk": 1, "display_url": "https://cdn.example.com/1.jpg"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/787132/stories"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let src = source(&server);
    assert_eq!(src.user_media(&natgeo(), 80).await.len(), 1);
    assert!(src.user_stories(&natgeo()).await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/787132/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>blocked</html>"))
        .mount(&server)
        .await;

    assert!(source(&server).user_highlights(&natgeo()).await.is_empty());
}

#[tokio::test]
async fn test_highlight_contents() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/highlights/17890"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pk": "17890",
            "items": [{"pk": 1}, {"pk": 2}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/highlights/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let src = source(&server);
    let found = HighlightRef {
        pk: 17890,
        title: None,
    };
    let missing = HighlightRef {
        pk: 404,
        title: None,
    };
    assert_eq!(src.highlight_contents(&found).await.unwrap().len(), 2);
    assert!(src.highlight_contents(&missing).await.is_none());
}

#[tokio::test]
async fn test_empty_api_key_sends_no_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let src = HttpProfileSource::new(&server.uri(), Some(String::new()), Duration::from_secs(5));
    assert!(src.api_key.is_none());
    assert!(src.search_users("x", 5).await.unwrap().is_empty());
}
