//! HTTP-backed collaborators against wiremock servers.

use cae_core::ErrorKind;
use cae_video::{
    ChatClassifier, MetadataSource, TextClassifier, Transcriber, VideoError,
    YtDlpWhisperTranscriber,
};
use cae_youtube::YoutubeClient;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn chat_classifier_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-4.1-mini",
            "messages": [
                { "role": "system", "content": "list sponsors" },
                { "role": "user", "content": "Video description: hi" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "Acme, Globex" } }]
        })))
        .mount(&server)
        .await;

    let classifier = ChatClassifier::new(
        &format!("{}/v1/", server.uri()),
        Some("sk-test".to_string()),
        "gpt-4.1-mini",
        10,
    )
    .unwrap();
    let answer = classifier
        .complete("list sponsors", "Video description: hi")
        .await
        .unwrap();

    assert_eq!(answer, "Acme, Globex");
}

#[tokio::test]
async fn chat_classifier_surfaces_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let classifier = ChatClassifier::new(&server.uri(), None, "m", 10).unwrap();
    let err = classifier.complete("x", "y").await.unwrap_err();

    match err {
        VideoError::Classifier { ref message, .. } => assert!(message.contains("429")),
        other => panic!("expected classifier error, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_classifier_rejects_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })))
        .mount(&server)
        .await;

    let classifier = ChatClassifier::new(&server.uri(), None, "m", 10).unwrap();
    assert!(matches!(
        classifier.complete("x", "y").await,
        Err(VideoError::Classifier { .. })
    ));
}

#[tokio::test]
async fn whisper_transcribes_uploaded_file_and_checks_health_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/inference"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "text": "  hello and welcome back  " })),
        )
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("abc.m4a");
    std::fs::write(&audio, b"not really audio").unwrap();

    let transcriber = YtDlpWhisperTranscriber::new("yt-dlp", &server.uri(), 1, 5).unwrap();
    let first = transcriber.transcribe_file("abc", &audio).await.unwrap();
    let second = transcriber.transcribe_file("abc", &audio).await.unwrap();

    assert_eq!(first, "hello and welcome back");
    assert_eq!(first, second);
}

#[tokio::test]
async fn whisper_down_is_a_model_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let transcriber = YtDlpWhisperTranscriber::new("yt-dlp", &server.uri(), 1, 5).unwrap();
    let err = transcriber.transcribe("dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(err, VideoError::ModelUnavailable(_)));
    assert_eq!(err.kind(), ErrorKind::Model);
}

#[tokio::test]
async fn missing_downloader_is_a_media_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let transcriber =
        YtDlpWhisperTranscriber::new("/nonexistent/bin/yt-dlp", &server.uri(), 1, 5).unwrap();
    let err = transcriber.transcribe("dQw4w9WgXcQ").await.unwrap_err();

    assert!(matches!(err, VideoError::MediaDownload { ref video_id, .. } if video_id == "dQw4w9WgXcQ"));
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn invalid_video_id_is_rejected_before_any_request() {
    let transcriber =
        YtDlpWhisperTranscriber::new("yt-dlp", "http://127.0.0.1:9", 1, 1).unwrap();
    let err = transcriber.transcribe("--exec rm").await.unwrap_err();

    assert!(matches!(err, VideoError::InvalidInput(_)));
    assert_eq!(err.kind(), ErrorKind::InputValidation);
}

#[tokio::test]
async fn youtube_client_provides_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "vid1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "items": [{
                "id": "vid1",
                "snippet": {
                    "title": "Budget phone showdown",
                    "description": "Sponsored by Acme.",
                    "publishedAt": "2025-05-01T00:00:00Z"
                },
                "statistics": { "viewCount": "10" },
                "contentDetails": { "duration": "PT12M" }
            }]
        })))
        .mount(&server)
        .await;

    let client = YoutubeClient::with_base_url("k", 5, "cae-test/0.1", &server.uri()).unwrap();
    let metadata = client.video_metadata("vid1").await.unwrap();

    assert_eq!(metadata.title, "Budget phone showdown");
    assert_eq!(metadata.description, "Sponsored by Acme.");
}
