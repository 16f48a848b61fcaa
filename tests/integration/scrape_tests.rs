use crate::common::{scraper_config, test_fetcher};
use gallery_harvester::scrape::{ImageCache, ScrapeOrchestrator};
use gallery_harvester::CacheError;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator() -> ScrapeOrchestrator {
    ScrapeOrchestrator::new(
        &scraper_config(),
        Arc::new(test_fetcher()),
        Arc::new(ImageCache::new()),
    )
}

#[tokio::test]
async fn test_scrape_counts_links_and_caches_photo() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/gallery/index.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><body>
                    <a href="/a">A</a>
                    <a href="/b">B</a>
                    <a href="/a">A again</a>
                    <img src="photo.jpg">
                    </body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gallery/photo.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/jpeg")
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let orchestrator = orchestrator();
    let info = orchestrator
        .scrape_page(&format!("{}/gallery/index.html", base_url))
        .await
        .expect("scrape failed");

    assert_eq!(info.status_code, 200);
    assert_eq!(info.links.len(), 2);
    assert_eq!(
        info.links[&format!("http://proxy.test:7171/?url={}/a", base_url)],
        2
    );
    assert_eq!(
        info.links[&format!("http://proxy.test:7171/?url={}/b", base_url)],
        1
    );

    assert_eq!(info.image_ref, "http://proxy.test:7171/image");
    assert_eq!(
        orchestrator.cache().get().unwrap(),
        vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]
    );
}

#[tokio::test]
async fn test_scrape_error_status_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"<a href="/x">x</a>"#))
        .mount(&mock_server)
        .await;

    let orchestrator = orchestrator();
    let info = orchestrator
        .scrape_page(&format!("{}/missing", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(info.status_code, 404);
    assert!(info.links.is_empty());
    assert!(matches!(orchestrator.cache().get(), Err(CacheError::Empty)));
}

#[tokio::test]
async fn test_scrape_unreachable_host() {
    let orchestrator = orchestrator();
    let info = orchestrator
        .scrape_page("http://127.0.0.1:9/")
        .await
        .unwrap();

    assert_eq!(info.status_code, 0);
    assert!(info.links.is_empty());
    assert_eq!(info.image_ref, "http://proxy.test:7171/image");
}

#[tokio::test]
async fn test_failed_image_keeps_previous_cache() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<img src="/good.jpg">"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<img src="/broken.jpg">"#))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/good.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"good".to_vec()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken.jpg"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let orchestrator = orchestrator();
    orchestrator
        .scrape_page(&format!("{}/first", base_url))
        .await
        .unwrap();
    let info = orchestrator
        .scrape_page(&format!("{}/second", base_url))
        .await
        .unwrap();

    assert!(info.cached_from.is_none());
    assert_eq!(orchestrator.cache().get().unwrap(), b"good");
}
