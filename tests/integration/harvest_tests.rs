use crate::common::{harvester_config, read_log_lines, test_fetcher};
use async_trait::async_trait;
use gallery_harvester::config::SuccessPolicy;
use gallery_harvester::crawler::{FetchResponse, Fetcher};
use gallery_harvester::harvester::{GalleryIdentifier, Harvester};
use gallery_harvester::FetchError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serves pages `1..=pages` of every gallery and cancels after `cancel_after` requests
struct CancellingStub {
    pages: u32,
    cancel_after: usize,
    cancel: CancellationToken,
    requested: Mutex<Vec<(String, u32)>>,
}

#[async_trait]
impl Fetcher for CancellingStub {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        let identifier = segments[segments.len() - 2].to_string();
        let page: u32 = segments[segments.len() - 1]
            .trim_end_matches(".jpg")
            .parse()
            .unwrap();

        let count = {
            let mut requested = self.requested.lock().unwrap();
            requested.push((identifier, page));
            requested.len()
        };
        if count >= self.cancel_after {
            self.cancel.cancel();
        }

        if page > self.pages {
            return Err(FetchError::Transport {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            });
        }

        Ok(FetchResponse {
            final_url: url.clone(),
            status_code: 200,
            content_type: "image/jpeg".to_string(),
            body: vec![0xFF, 0xD8, page as u8],
        })
    }
}

#[tokio::test]
async fn test_gallery_download_over_http() {
    let mock_server = MockServer::start().await;

    for page in 1..=3u8 {
        Mock::given(method("GET"))
            .and(path(format!("/galleries/004242/{}.jpg", page)))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(vec![0xFF, 0xD8, page]),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    // Page 4 is unmatched, so wiremock answers 404 and the gallery ends
    let dir = TempDir::new().unwrap();
    let config = harvester_config(dir.path(), &mock_server.uri());
    let log_path = config.log_path();

    let mut harvester = Harvester::new(config, Arc::new(test_fetcher()))
        .await
        .expect("Failed to create harvester");

    let outcome = harvester
        .harvest_gallery(GalleryIdentifier::from_number(4242), &CancellationToken::new())
        .await;

    assert_eq!(outcome.pages_saved, 3);
    assert_eq!(outcome.last_page, 4);

    for page in 1..=3u8 {
        let file = dir.path().join(format!("004242_{}.jpg", page));
        assert_eq!(std::fs::read(&file).unwrap(), vec![0xFF, 0xD8, page]);
    }
    assert!(!dir.path().join("004242_4.jpg").exists());

    let lines = read_log_lines(&log_path);
    assert_eq!(lines.len(), 3);
    for (line, page) in lines.iter().zip(1..) {
        assert!(line.starts_with('['));
        assert!(
            line.ends_with(&format!("] Downloaded: 004242 page {}", page)),
            "unexpected log line: {}",
            line
        );
    }
}

#[tokio::test]
async fn test_lenient_policy_saves_error_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/galleries/000007/1.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"page one".to_vec()))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = harvester_config(dir.path(), &mock_server.uri());
    config.success_policy = SuccessPolicy::Lenient;

    // Lenient accepts every response, so the walk only ends once page 3 is on disk
    let mut harvester = Harvester::new(config, Arc::new(test_fetcher()))
        .await
        .unwrap();
    let cancel = CancellationToken::new();
    let stopper = cancel.clone();
    let root = dir.path().to_path_buf();
    let watcher = tokio::spawn(async move {
        while !root.join("000007_3.jpg").exists() {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        stopper.cancel();
    });

    let outcome = harvester
        .harvest_gallery(GalleryIdentifier::from_number(7), &cancel)
        .await;
    watcher.await.unwrap();

    assert!(outcome.cancelled);
    assert!(outcome.pages_saved >= 3);
    assert_eq!(
        std::fs::read(dir.path().join("000007_1.jpg")).unwrap(),
        b"page one"
    );
    // Page 2 was a 404 from the mock server but still counts under the lenient policy
    assert!(dir.path().join("000007_2.jpg").exists());
}

#[tokio::test]
async fn test_run_writes_k_pages_per_identifier_in_order() {
    let dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let stub = Arc::new(CancellingStub {
        pages: 2,
        cancel_after: 7,
        cancel: cancel.clone(),
        requested: Mutex::new(Vec::new()),
    });

    let config = harvester_config(dir.path(), "https://img.test");
    let log_path = config.log_path();
    let mut harvester = Harvester::new(config, stub.clone())
        .await
        .unwrap()
        .with_rng(StdRng::seed_from_u64(2024));

    let stats = harvester.run_until_cancelled(&cancel).await;

    // Same seed, same identifier sequence
    let mut expected_rng = StdRng::seed_from_u64(2024);
    let ids: Vec<GalleryIdentifier> = (0..3)
        .map(|_| GalleryIdentifier::random(&mut expected_rng, 1_000_000))
        .collect();

    let requested = stub.requested.lock().unwrap().clone();
    let expected: Vec<(String, u32)> = [(0, 1), (0, 2), (0, 3), (1, 1), (1, 2), (1, 3), (2, 1)]
        .iter()
        .map(|&(gallery, page)| (ids[gallery].to_string(), page))
        .collect();
    assert_eq!(requested, expected);

    // The 7th fetch succeeded before cancellation was observed, so it is kept
    assert_eq!(stats.galleries_tried, 3);
    assert_eq!(stats.galleries_found, 3);
    assert_eq!(stats.pages_saved, 5);
    assert_eq!(stats.storage_failures, 0);

    let lines = read_log_lines(&log_path);
    assert_eq!(lines.len(), 5);
    assert!(lines[1].ends_with(&format!("Downloaded: {} page 2", ids[0])));
    assert!(lines[3].ends_with(&format!("Downloaded: {} page 2", ids[1])));
    assert!(lines[4].ends_with(&format!("Downloaded: {} page 1", ids[2])));

    for (gallery, pages) in [(0, 2), (1, 2), (2, 1)] {
        for page in 1..=pages {
            let file = dir.path().join(format!("{}_{}.jpg", ids[gallery], page));
            assert!(file.exists(), "missing {}", file.display());
        }
        let next = dir.path().join(format!("{}_{}.jpg", ids[gallery], pages + 1));
        assert!(!next.exists());
    }
}

#[tokio::test]
async fn test_storage_failure_does_not_stop_walk() {
    let dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let stub = Arc::new(CancellingStub {
        pages: 3,
        cancel_after: usize::MAX,
        cancel: cancel.clone(),
        requested: Mutex::new(Vec::new()),
    });

    let config = harvester_config(dir.path(), "https://img.test");
    let mut harvester = Harvester::new(config, stub.clone()).await.unwrap();

    // A directory in place of page 2's file makes that write fail
    std::fs::create_dir(dir.path().join("000100_2.jpg")).unwrap();

    let outcome = harvester
        .harvest_gallery(GalleryIdentifier::from_number(100), &cancel)
        .await;

    assert_eq!(outcome.pages_saved, 2);
    assert_eq!(outcome.last_page, 4);
    assert_eq!(harvester.stats().storage_failures, 1);
    assert!(dir.path().join("000100_3.jpg").exists());
}
