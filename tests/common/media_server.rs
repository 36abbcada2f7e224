//! Minimal HTTP/1.1 responder serving canned media responses

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned response for one path
#[derive(Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Route {
    pub fn ok(content_type: Option<&'static str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: Some("text/plain"),
            body: b"error".to_vec(),
        }
    }
}

/// Test server instance
pub struct MediaServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MediaServer {
    /// Serve `routes` on an OS-assigned local port; unknown paths get 404
    pub async fn start(routes: Vec<(&'static str, Route)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<&'static str, Route>> = Arc::new(routes.into_iter().collect());

        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let routes = routes.clone();

                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buffer = [0u8; 1024];
                    loop {
                        let read = match socket.read(&mut buffer).await {
                            Ok(0) | Err(_) => break,
                            Ok(read) => read,
                        };
                        request.extend_from_slice(&buffer[..read]);
                        if request.windows(4).any(|window| window == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&request);
                    let path = request
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();
                    let route = routes
                        .get(path.as_str())
                        .cloned()
                        .unwrap_or_else(|| Route::status(404));

                    let mut response = format!(
                        "HTTP/1.1 {} Canned\r\nContent-Length: {}\r\nConnection: close\r\n",
                        route.status,
                        route.body.len()
                    );
                    if let Some(content_type) = route.content_type {
                        response.push_str(&format!("Content-Type: {}\r\n", content_type));
                    }
                    response.push_str("\r\n");

                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.write_all(&route.body).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self { addr, handle }
    }

    /// Get full URL for a path
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for MediaServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
