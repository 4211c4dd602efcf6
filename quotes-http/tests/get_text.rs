use quotes_http::{HttpClient, HttpError, Page, RequestOpts};
use std::time::Duration;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

#[tokio::test]
async fn returns_body_of_base_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let body = client.get_text("", RequestOpts::default()).await.unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn joins_relative_paths_onto_base() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("two"))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let body = client
        .get_text("page/2/", RequestOpts::default())
        .await
        .unwrap();
    assert_eq!(body, "two");
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_text("", RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Status {
            status,
            body_snippet,
        } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body_snippet, "down for maintenance");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_is_a_network_error() {
    let client = HttpClient::new(&closed_port_url()).unwrap();
    let err = client
        .get_text("", RequestOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn per_request_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_text(
            "",
            RequestOpts {
                timeout: Some(Duration::from_millis(100)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn get_page_keeps_the_declared_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<p>bare</p>".to_vec()))
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let page = client.get_page("", RequestOpts::default()).await.unwrap();
    assert_eq!(
        page,
        Page {
            body: "{}".into(),
            content_type: Some("application/json".into()),
        }
    );
    assert!(!page.is_html());

    let bare = client.get_page("bare", RequestOpts::default()).await.unwrap();
    assert_eq!(bare.content_type, None);
    assert!(bare.is_html());
}
