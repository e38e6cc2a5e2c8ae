//! Integration tests for `YoutubeClient` using wiremock HTTP mocks.

use cae_youtube::{StatsCriteria, YoutubeClient, YoutubeError};
use chrono::{Duration, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHANNEL_ID: &str = "UC_x5XG1OV2P6uZZ5FSM9Ttw";

fn test_client(base_url: &str) -> YoutubeClient {
    YoutubeClient::with_base_url("test-key", 30, "cae-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn video_json(id: &str, days_ago: i64, duration: &str, views: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "snippet": {
            "title": format!("Video {id}"),
            "description": "",
            "publishedAt": (Utc::now() - Duration::days(days_ago)).to_rfc3339(),
            "thumbnails": {
                "high": { "url": format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg") }
            }
        },
        "statistics": { "viewCount": views.to_string(), "likeCount": "10", "commentCount": "1" },
        "contentDetails": { "duration": duration }
    })
}

async fn mount_uploads(server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "contentDetails"))
        .and(query_param("id", CHANNEL_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": CHANNEL_ID,
                "contentDetails": { "relatedPlaylists": { "uploads": "UU_uploads" } }
            }]
        })))
        .mount(server)
        .await;

    let items: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "contentDetails": { "videoId": id } }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UU_uploads"))
        .and(query_param("maxResults", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": items })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_video_statistics_filters_old_and_short_videos() {
    let server = MockServer::start().await;
    mount_uploads(&server, &["a", "b", "c", "d"]).await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "a,b,c,d"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                video_json("a", 5, "PT10M", 1_000),
                video_json("b", 400, "PT10M", 2_000),
                video_json("c", 5, "PT45S", 3_000),
                video_json("d", 20, "PT1H2M3S", 4_000)
            ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .fetch_video_statistics(CHANNEL_ID, &StatsCriteria::default())
        .await
        .expect("should fetch statistics");

    let ids: Vec<&str> = records.iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "d"]);
    assert_eq!(records[1].view_count, 4_000);
    assert!((records[1].duration_minutes - 62.05).abs() < 1e-9);
}

#[tokio::test]
async fn fetch_video_statistics_with_no_uploads_is_empty() {
    let server = MockServer::start().await;
    mount_uploads(&server, &[]).await;

    let client = test_client(&server.uri());
    let records = client
        .fetch_video_statistics(CHANNEL_ID, &StatsCriteria::default())
        .await
        .expect("empty channel is not an error");

    assert!(records.is_empty());
}

#[tokio::test]
async fn handle_is_resolved_through_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "veritasium"))
        .and(query_param("type", "channel"))
        .and(query_param("maxResults", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": { "kind": "youtube#channel", "channelId": CHANNEL_ID },
                "snippet": { "title": "Veritasium", "description": "Science" }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let id = client
        .resolve_channel_id("@veritasium")
        .await
        .expect("should resolve handle");

    assert_eq!(id, CHANNEL_ID);
}

#[tokio::test]
async fn unresolvable_channel_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_video_statistics("nobody-here", &StatsCriteria::default())
        .await
        .unwrap_err();

    assert!(matches!(err, YoutubeError::ChannelNotFound(ref q) if q == "nobody-here"));
}

#[tokio::test]
async fn api_error_envelope_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "The request cannot be completed because you have exceeded your quota." }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.video_details("abc").await.unwrap_err();

    match err {
        YoutubeError::Api {
            ref context,
            status,
            ref message,
        } => {
            assert_eq!(status, 403);
            assert!(context.contains("abc"), "context should name the id: {context}");
            assert!(message.contains("quota"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(!err.is_retriable());
}

#[tokio::test]
async fn server_error_is_retriable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend unavailable"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.channel_info(CHANNEL_ID).await.unwrap_err();

    assert!(matches!(err, YoutubeError::Api { status: 503, .. }));
    assert!(err.is_retriable());
}

#[tokio::test]
async fn video_details_unknown_id_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.video_details("missing").await.unwrap_err();

    assert!(matches!(err, YoutubeError::VideoNotFound(ref id) if id == "missing"));
}

#[tokio::test]
async fn video_details_exposes_best_thumbnail() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [video_json("xyz", 1, "PT7M", 99)]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let details = client.video_details("xyz").await.expect("should fetch video");

    assert_eq!(details.title, "Video xyz");
    assert_eq!(details.view_count, 99);
    assert_eq!(
        details.best_thumbnail_url(),
        Some("https://i.ytimg.com/vi/xyz/hqdefault.jpg")
    );
}

#[tokio::test]
async fn channel_info_parses_counters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "snippet,statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": CHANNEL_ID,
                "snippet": { "title": "Google for Developers", "description": "Dev content" },
                "statistics": { "subscriberCount": "2500000", "viewCount": "300000000", "videoCount": "6000" }
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let info = client.channel_info(CHANNEL_ID).await.expect("should parse channel");

    assert_eq!(info.title, "Google for Developers");
    assert_eq!(info.subscriber_count, 2_500_000);
    assert_eq!(info.video_count, 6_000);
}

#[tokio::test]
async fn fetch_comments_pages_until_limit() {
    let server = MockServer::start().await;

    let thread = |id: &str, text: Option<&str>| {
        serde_json::json!({
            "snippet": {
                "topLevelComment": {
                    "id": id,
                    "snippet": {
                        "authorDisplayName": "viewer",
                        "textDisplay": text,
                        "likeCount": 2,
                        "publishedAt": "2025-05-01T00:00:00Z"
                    }
                }
            }
        })
    };

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "vid"))
        .and(query_param("order", "time"))
        .and(query_param("pageToken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [thread("c3", Some("third")), thread("c4", Some("fourth"))]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/commentThreads"))
        .and(query_param("videoId", "vid"))
        .and(query_param("maxResults", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [thread("c1", Some("first")), thread("c2", None)],
            "nextPageToken": "page2"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client.fetch_comments("vid", 3).await.expect("should page");

    let ids: Vec<&str> = comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c3", "c4"]);
    assert_eq!(comments[0].author, "viewer");
}

#[tokio::test]
async fn malformed_payload_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_channels("anything", 5).await.unwrap_err();

    assert!(matches!(err, YoutubeError::Deserialize { .. }));
}

#[tokio::test]
async fn search_channel_videos_hydrates_in_search_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("channelId", CHANNEL_ID))
        .and(query_param("q", "camera test"))
        .and(query_param("type", "video"))
        .and(query_param("order", "relevance"))
        .and(query_param("maxResults", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [
                { "id": { "kind": "youtube#video", "videoId": "b" }, "snippet": { "title": "B" } },
                { "id": { "kind": "youtube#playlist", "playlistId": "PL1" } },
                { "id": { "kind": "youtube#video", "videoId": "a" }, "snippet": { "title": "A" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "b,a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [video_json("a", 3, "PT8M", 10), video_json("b", 5, "PT9M", 20)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client
        .search_channel_videos(CHANNEL_ID, " camera test ", 5)
        .await
        .expect("search should succeed");

    let ids: Vec<&str> = videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(videos[0].view_count, 20);
}

#[tokio::test]
async fn search_channel_videos_without_matches_skips_hydration() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let videos = client
        .search_channel_videos(CHANNEL_ID, "nothing", 10)
        .await
        .unwrap();

    assert!(videos.is_empty());
}

#[tokio::test]
async fn search_channel_videos_rejects_blank_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_channel_videos(CHANNEL_ID, "   ", 10)
        .await
        .unwrap_err();

    assert!(matches!(err, YoutubeError::InvalidInput(_)));
}

#[tokio::test]
async fn channel_overview_composes_resolution_info_and_uploads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "googledevs"))
        .and(query_param("type", "channel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{ "id": { "channelId": CHANNEL_ID }, "snippet": { "title": "Google for Developers" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("part", "snippet,statistics"))
        .and(query_param("id", CHANNEL_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": CHANNEL_ID,
                "snippet": { "title": "Google for Developers", "description": "Dev content" },
                "statistics": { "subscriberCount": "2500000", "viewCount": "300000000", "videoCount": "6000" }
            }]
        })))
        .mount(&server)
        .await;
    mount_uploads(&server, &["n1", "n2"]).await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "n1,n2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [video_json("n1", 1, "PT5M", 100), video_json("n2", 2, "PT6M", 200)]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let overview = client
        .channel_overview("@googledevs", 50)
        .await
        .expect("overview should succeed");

    assert_eq!(overview.channel.id, CHANNEL_ID);
    assert_eq!(overview.channel.subscriber_count, 2_500_000);
    let ids: Vec<&str> = overview.recent_videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);
}
