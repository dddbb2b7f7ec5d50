//! Minimal HTTP document store for remote sink tests
//!
//! Accepts a single request on an ephemeral port, captures it, and answers
//! with a fixed status.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use stream_monitor::RemoteSinkConfig;

/// One captured insert request
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Fake store answering one request with `status`
pub struct DocumentStore {
    port: u16,
    handle: JoinHandle<CapturedRequest>,
}

impl DocumentStore {
    pub fn start(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut parts = request_line.split_whitespace();
            let method = parts.next().unwrap_or_default().to_string();
            let path = parts.next().unwrap_or_default().to_string();

            let mut headers = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    let (k, v) = (k.trim().to_string(), v.trim().to_string());
                    if k.eq_ignore_ascii_case("content-length") {
                        content_length = v.parse().unwrap();
                    }
                    headers.push((k, v));
                }
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).unwrap();

            let reason = if status < 300 { "Created" } else { "Error" };
            let reply_body = if status < 300 { "" } else { "insert refused" };
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                reason,
                reply_body.len(),
                reply_body
            )
            .unwrap();
            stream.flush().unwrap();

            CapturedRequest {
                method,
                path,
                headers,
                body: serde_json::from_slice(&body).unwrap(),
            }
        });
        Self { port, handle }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Remote configuration pointing at this store
    pub fn config(&self) -> RemoteSinkConfig {
        RemoteSinkConfig {
            username: "monitor".to_string(),
            password: "s3cret".to_string(),
            database: "telemetry".to_string(),
            collection: "observations".to_string(),
            address: "127.0.0.1".to_string(),
            port: self.port,
        }
    }

    /// Wait for the captured request
    pub fn finish(self) -> CapturedRequest {
        self.handle.join().unwrap()
    }
}
