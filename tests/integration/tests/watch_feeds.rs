//! Polling a slow feed simulation endpoint

use credfeed_client::{config::Cluster, crossbar::CrossbarClient, poller::Poller, ClientError};
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_slow_responses_do_not_overlap() {
    let server = MockServer::start().await;
    let feed = Pubkey::new_unique();

    Mock::given(method("GET"))
        .and(path_regex(r"^/simulate/solana/devnet/.+$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "feed": feed.to_string(), "results": [1.0] }]))
                .set_delay(Duration::from_millis(250)),
        )
        .mount(&server)
        .await;

    let crossbar = CrossbarClient::new(server.uri());
    let crossbar = &crossbar;
    let feeds = [feed];
    let feeds = &feeds;

    let poller = Poller::new(Duration::from_millis(50)).with_max_iterations(3);
    let started = Instant::now();
    let stats = poller
        .run(
            move |_| async move {
                crossbar
                    .simulate_solana_feeds(Cluster::Devnet, feeds)
                    .await
                    .map(|_| ())
            },
            std::future::pending(),
        )
        .await;

    assert_eq!(stats.succeeded, 3);
    // Sequential calls: at least three full response delays
    assert!(started.elapsed() >= Duration::from_millis(750));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_failed_rounds_do_not_stop_polling() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let crossbar = CrossbarClient::new(server.uri());
    let crossbar = &crossbar;
    let feeds = [Pubkey::new_unique()];
    let feeds = &feeds;

    let stats = Poller::new(Duration::from_millis(10))
        .with_max_iterations(4)
        .run(
            move |_| async move {
                crossbar
                    .simulate_solana_feeds(Cluster::Devnet, feeds)
                    .await
                    .map(|_| ())
            },
            std::future::pending(),
        )
        .await;

    assert_eq!(stats.failed, 2);
    assert_eq!(stats.succeeded, 2);
}

#[tokio::test]
async fn test_until_surfaces_exhaustion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let crossbar = CrossbarClient::new(server.uri());
    let crossbar = &crossbar;
    let feeds = [Pubkey::new_unique()];
    let feeds = &feeds;

    // An empty simulation never yields a value
    let result = Poller::new(Duration::from_millis(10))
        .with_max_iterations(2)
        .until(move || async move {
            let sims = crossbar.simulate_solana_feeds(Cluster::Devnet, feeds).await?;
            Ok(sims.first().and_then(|s| s.value()))
        })
        .await;

    assert!(matches!(result, Err(ClientError::PollExhausted(2))));
}
