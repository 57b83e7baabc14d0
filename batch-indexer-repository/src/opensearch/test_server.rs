//! Local HTTP server answering requests with canned replies.
//!
//! Connections are served one at a time, each with the next queued reply, and
//! closed afterwards so every client request lands on a fresh connection.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// What the server does with one request.
pub(crate) enum Reply {
    /// Answer with a status and a JSON body.
    Json(u16, &'static str),
    /// Read the request and never answer.
    Hang,
}

pub(crate) struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl TestServer {
    pub(crate) async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = requests.clone();
        let task = tokio::spawn(async move {
            for reply in replies {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                let mut stream = BufReader::new(stream);
                let Ok(request) = read_request(&mut stream).await else {
                    continue;
                };
                let head_only = request.starts_with("HEAD ");
                recorded.lock().await.push(request);

                match reply {
                    Reply::Json(status, body) => {
                        let _ = write_reply(stream.get_mut(), status, body, head_only).await;
                    }
                    Reply::Hang => {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    }
                }
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub(crate) fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Raw requests received so far, head and body.
    pub(crate) async fn requests(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A URL nothing listens on.
pub(crate) async fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn read_request(stream: &mut BufReader<TcpStream>) -> std::io::Result<String> {
    let mut request = String::new();
    let mut content_length = 0;
    let mut chunked = false;

    loop {
        let mut line = String::new();
        if stream.read_line(&mut line).await? == 0 {
            return Ok(request);
        }
        let lower = line.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
            chunked = true;
        }
        request.push_str(&line);
        if line == "\r\n" {
            break;
        }
    }

    let mut body = Vec::new();
    if chunked {
        loop {
            let mut size_line = String::new();
            stream.read_line(&mut size_line).await?;
            let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
            // Chunk data is followed by CRLF, the last chunk by an empty line.
            let mut chunk = vec![0; size + 2];
            stream.read_exact(&mut chunk).await?;
            if size == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    } else {
        body.resize(content_length, 0);
        stream.read_exact(&mut body).await?;
    }

    request.push_str(&String::from_utf8_lossy(&body));
    Ok(request)
}

async fn write_reply(
    stream: &mut TcpStream,
    status: u16,
    body: &str,
    head_only: bool,
) -> std::io::Result<()> {
    let mut response = format!(
        "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        status,
        body.len()
    );
    if !head_only {
        response.push_str(body);
    }
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
