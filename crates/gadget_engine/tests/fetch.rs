use std::time::Duration;

use gadget_engine::{
    ContentClass, EngineEvent, EngineHandle, EngineStopped, FailureKind, FetchSettings, Fetcher,
    ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Release Notes</title>
  <link rel="self" href="http://notes.example/atom"/>
  <link rel="alternate" href="http://notes.example/"/>
  <id>urn:notes</id>
  <updated>2024-01-02T00:00:00Z</updated>
  <entry>
    <title>1.0</title>
    <link href="http://notes.example/1.0"/>
    <id>urn:notes:1</id>
    <updated>2024-01-02T00:00:00Z</updated>
    <content type="html">&lt;p&gt;Shipped&lt;/p&gt;</content>
  </entry>
</feed>"#;

#[tokio::test]
async fn fetcher_returns_body_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/snippet"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<b>hi</b>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let url = format!("{}/snippet", server.uri());

    let output = fetcher.fetch(&url, ContentClass::Text).await.expect("fetch ok");
    assert_eq!(output.metadata.original_url, url);
    assert_eq!(output.metadata.final_url, output.metadata.original_url);
    assert_eq!(output.metadata.redirect_count, 0);
    assert_eq!(output.metadata.byte_len, 9);
    assert_eq!(output.bytes, b"<b>hi</b>");
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let err = fetcher
        .fetch(&format!("{}/missing", server.uri()), ContentClass::Text)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()), ContentClass::Text)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings);
    let err = fetcher
        .fetch(&format!("{}/large", server.uri()), ContentClass::Text)
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn content_class_selects_accepted_types() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "image/png"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>x</p>", "text/html; charset=utf-8"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<rss/>", "application/rss+xml"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    let image = format!("{}/image", server.uri());
    let page = format!("{}/page", server.uri());
    let rss = format!("{}/rss", server.uri());

    assert_eq!(
        fetcher.fetch(&image, ContentClass::Text).await.unwrap_err().kind,
        FailureKind::UnsupportedContentType {
            content_type: "image/png".to_string()
        }
    );
    assert_eq!(
        fetcher.fetch(&page, ContentClass::Feed).await.unwrap_err().kind,
        FailureKind::UnsupportedContentType {
            content_type: "text/html".to_string()
        }
    );
    assert!(fetcher.fetch(&page, ContentClass::Text).await.is_ok());
    assert!(fetcher.fetch(&rss, ContentClass::Feed).await.is_ok());
    assert!(fetcher.fetch(&rss, ContentClass::Text).await.is_err());
}

#[tokio::test]
async fn empty_allow_list_accepts_any_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/image"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "image/png"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        text_content_types: Vec::new(),
        ..FetchSettings::default()
    };
    let output = ReqwestFetcher::new(settings)
        .fetch(&format!("{}/image", server.uri()), ContentClass::Text)
        .await
        .expect("fetch ok");
    assert_eq!(output.bytes, vec![0u8; 4]);
}

#[tokio::test]
async fn fetcher_rejects_non_http_urls() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default());
    assert_eq!(fetcher.fetch("n/a", ContentClass::Text).await.unwrap_err().kind, FailureKind::InvalidUrl);
    assert_eq!(
        fetcher.fetch("file:///etc/hosts", ContentClass::Feed).await.unwrap_err().kind,
        FailureKind::InvalidUrl
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_delivers_parsed_feed_and_decoded_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/atom"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ATOM, "application/atom+xml"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(vec![b'n', 0xE9], "text/plain; charset=iso-8859-1"),
        )
        .mount(&server)
        .await;

    let feed_url = format!("{}/atom", server.uri());
    let text_url = format!("{}/latin1", server.uri());
    let handle = EngineHandle::new(FetchSettings::default());
    handle.fetch_feed(1, feed_url.clone(), Some(5));
    handle.fetch_text(2, text_url.clone());

    let mut events = tokio::task::spawn_blocking(move || {
        let mut events = Vec::new();
        while events.len() < 2 {
            match handle.recv_timeout(Duration::from_secs(10)) {
                Ok(Some(event)) => events.push(event),
                _ => break,
            }
        }
        events
    })
    .await
    .expect("join");
    events.sort_by_key(EngineEvent::request);
    assert_eq!(events.len(), 2);

    match &events[0] {
        EngineEvent::FeedFetched { request, url, result } => {
            assert_eq!(*request, 1);
            assert_eq!(url, &feed_url);
            let feed = result.as_ref().expect("feed parsed");
            assert_eq!(feed.title.as_deref(), Some("Release Notes"));
            assert_eq!(feed.link.as_deref(), Some("http://notes.example/"));
            assert_eq!(feed.entries.len(), 1);
            assert_eq!(feed.entries[0].summary.as_deref(), Some("<p>Shipped</p>"));
        }
        other => panic!("unexpected event {other:?}"),
    }
    match &events[1] {
        EngineEvent::TextFetched { request, result, .. } => {
            assert_eq!(*request, 2);
            assert_eq!(result.as_deref(), Ok("né"));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn engine_reports_failures_as_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not xml", "application/xml"))
        .mount(&server)
        .await;

    let handle = EngineHandle::new(FetchSettings::default());
    handle.fetch_feed(7, format!("{}/broken", server.uri()), None);
    let event = tokio::task::spawn_blocking(move || handle.recv_timeout(Duration::from_secs(10)))
        .await
        .expect("join")
        .expect("engine running")
        .expect("event");

    match event {
        EngineEvent::FeedFetched { request, result, .. } => {
            assert_eq!(request, 7);
            assert_eq!(result.unwrap_err().kind, FailureKind::Parse);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_disconnects_the_event_stream() {
    let handle = EngineHandle::new(FetchSettings::default());
    handle.shutdown();
    handle.fetch_text(1, "http://127.0.0.1:9/never");

    let result = tokio::task::spawn_blocking(move || handle.recv_timeout(Duration::from_secs(10)))
        .await
        .expect("join");
    assert_eq!(result, Err(EngineStopped));
}
