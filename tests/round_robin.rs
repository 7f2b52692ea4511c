//! End-to-end round-robin behavior through a real listener.

use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn alternates_between_backends() {
    let a = common::start_mock_backend("hello-A").await;
    let b = common::start_mock_backend("hello-B").await;
    let proxy = common::start_proxy(&[a.url(), b.url()]).await;
    let client = common::client();

    for expected in ["hello-A", "hello-B", "hello-A"] {
        let res = client.get(proxy.url("/")).send().await.expect("proxy reachable");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.text().await.unwrap(), expected);
    }
    assert_eq!(a.hits(), 2);
    assert_eq!(b.hits(), 1);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn preserves_method_path_and_query() {
    let a = common::start_mock_backend("ok").await;
    let proxy = common::start_proxy(&[a.url()]).await;

    let res = common::client()
        .delete(proxy.url("/items/9?soft=true"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["x-seen-request"],
        "DELETE /items/9?soft=true HTTP/1.1"
    );
    assert!(res.headers().contains_key("x-request-id"));

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn no_backends_returns_503() {
    let proxy = common::start_proxy(&[]).await;
    let client = common::client();

    let res = client.get(proxy.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.text().await.unwrap(), "No backend available");

    let res = client.post(proxy.url("/submit")).body("data").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn unreachable_backend_returns_502_and_rotation_continues() {
    let dead = common::unreachable_addr().await;
    let live = common::start_mock_backend("alive").await;
    let proxy = common::start_proxy(&[format!("http://{dead}"), live.url()]).await;
    let client = common::client();

    let res = client.get(proxy.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    // The failed pick still advanced the cursor, so the next request lands on
    // the live backend rather than being retried against it.
    let res = client.get(proxy.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "alive");
    assert_eq!(live.hits(), 1);

    let res = client.get(proxy.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    proxy.shutdown.trigger();
}

#[tokio::test]
async fn single_unreachable_backend_is_not_retried() {
    let dead = common::unreachable_addr().await;
    let proxy = common::start_proxy(&[format!("http://{dead}")]).await;
    let client = common::client();

    for _ in 0..3 {
        let res = client.get(proxy.url("/")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(res.text().await.unwrap(), "Upstream request failed");
    }

    proxy.shutdown.trigger();
}
