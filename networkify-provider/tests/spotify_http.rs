//! Spotify Provider 的 HTTP 行为测试（本地桩服务，不访问真实接口）

#![cfg(feature = "spotify")]

use std::sync::Arc;

use networkify_provider::{
    FollowGraphProvider, ProviderCredentials, ProviderError, SpotifyEndpoints, SpotifyProvider,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

type Responder = Arc<dyn Fn(&str, &str, &str) -> (u16, String) + Send + Sync>;

/// 启动一个按路径返回固定内容的 HTTP 服务，返回基础地址
async fn spawn_stub(responder: Responder) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            let responder = Arc::clone(&responder);
            tokio::spawn(async move {
                handle(stream, responder).await;
            });
        }
    });

    format!("http://{addr}")
}

async fn handle(mut stream: TcpStream, responder: Responder) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let authorization = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("authorization")
                .then(|| value.trim().to_string())
        })
        .unwrap_or_default();

    let (status, body) = responder(&method, &path, &authorization);
    let response = format!(
        "HTTP/1.1 {status} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

fn provider_for(base: &str, token: &str) -> SpotifyProvider {
    SpotifyProvider::with_endpoints(
        ProviderCredentials::new(token),
        SpotifyEndpoints {
            pathfinder_url: format!("{base}/pathfinder/v2/query"),
            spclient_base: base.to_string(),
        },
    )
}

#[tokio::test]
async fn fetches_current_account_with_bearer_token() {
    let base = spawn_stub(Arc::new(|method, path, auth| {
        if method == "POST" && path == "/pathfinder/v2/query" && auth == "Bearer good" {
            (
                200,
                r#"{"data":{"me":{"profile":{"username":"me","name":"Me","avatar":null}}}}"#
                    .to_string(),
            )
        } else {
            (401, r#"{"error":"unauthorized"}"#.to_string())
        }
    }))
    .await;

    let account = provider_for(&base, "good")
        .fetch_current_account()
        .await
        .unwrap();
    assert_eq!(account.id, "me");
    assert_eq!(account.display_name, "Me");
    assert_eq!(account.avatar_url, None);

    let err = provider_for(&base, "bad")
        .fetch_current_account()
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
}

#[tokio::test]
async fn fetches_both_relation_lists() {
    let base = spawn_stub(Arc::new(|_, path, _| match path {
        "/user-profile-view/v3/profile/me/following" => (
            200,
            r#"{"profiles":[
                {"uri":"spotify:user:x","name":"X"},
                {"uri":"spotify:user:y","name":"Y","image_url":"https://i/y.jpg"},
                {"uri":"spotify:artist:abc","name":"Band"}
            ]}"#
            .to_string(),
        ),
        "/user-profile-view/v3/profile/me/followers" => (200, "{}".to_string()),
        _ => (404, "{}".to_string()),
    }))
    .await;

    let relations = provider_for(&base, "t")
        .fetch_follow_relations("me")
        .await
        .unwrap();

    assert!(relations.followers.is_empty());
    let ids: Vec<_> = relations.following.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["x", "y", "spotify:artist:abc"]);
    assert_eq!(
        relations.following[1].avatar_url.as_deref(),
        Some("https://i/y.jpg")
    );
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let base = spawn_stub(Arc::new(|_, _, _| (200, "<html>oops</html>".to_string()))).await;

    let err = provider_for(&base, "t")
        .fetch_follow_relations("someone")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::ParseError { .. }));
}

#[tokio::test]
async fn server_error_is_unexpected_response() {
    let base = spawn_stub(Arc::new(|_, _, _| (502, "bad gateway".to_string()))).await;

    let err = provider_for(&base, "t")
        .fetch_follow_relations("someone")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::UnexpectedResponse { status: 502, .. }
    ));
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    // 绑定后立即释放端口，保证连接被拒绝
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = provider_for(&format!("http://{addr}"), "t")
        .fetch_follow_relations("someone")
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NetworkError { .. }));
}
