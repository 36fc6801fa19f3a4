//! Generator HTTP server implementation

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use super::routes::{dispatch, Request, Response};
use crate::codegen::CodegenOptions;
use crate::config::ServerConfig;
use crate::errors::{ApisnipError, Result};

/// Largest accepted request head
const MAX_HEAD_BYTES: usize = 16 * 1024;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// HTTP host for the generator
pub struct GeneratorServer {
    listener: TcpListener,
    cors: bool,
    options: Arc<CodegenOptions>,
}

impl GeneratorServer {
    /// Bind the configured address
    pub async fn bind(config: &ServerConfig, options: CodegenOptions) -> Result<Self> {
        let addr: SocketAddr = config.address().parse()
            .map_err(|e| ApisnipError::Config(format!("Invalid address '{}': {}", config.address(), e)))?;

        let listener = TcpListener::bind(&addr).await
            .map_err(|e| ApisnipError::Server(format!("Cannot bind {}: {}", addr, e)))?;

        Ok(Self {
            listener,
            cors: config.cors,
            options: Arc::new(options),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the process is stopped
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!(%addr, cors = self.cors, "Generator server listening");

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Generator server shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => {
                        let options = Arc::clone(&self.options);
                        let cors = self.cors;

                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, peer_addr, &options, cors).await {
                                warn!(%peer_addr, error = %e, "Connection error");
                            }
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "Accept error");
                    }
                },
            }
        }
    }
}

/// Handle a single connection
async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    options: &CodegenOptions,
    cors: bool,
) -> Result<()> {
    let started = Instant::now();

    let response = match read_request(&mut stream).await? {
        Some(Ok(request)) => {
            let response = dispatch(&request, options);
            info!(
                %peer_addr,
                method = %request.method,
                path = %request.path,
                status = response.status,
                elapsed_us = started.elapsed().as_micros() as u64,
                "Request handled"
            );
            response
        }
        Some(Err(response)) => response,
        None => return Ok(()),
    };

    stream.write_all(&response.to_bytes(cors)).await?;
    stream.flush().await?;
    Ok(())
}

/// Read one request.
///
/// `None` when the peer closed without sending anything; `Some(Err(_))` carries
/// the error response for a request that cannot be served.
async fn read_request<R>(stream: &mut R) -> Result<Option<std::result::Result<Request, Response>>>
where
    R: AsyncRead + Unpin,
{
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find_head_end(&buf) {
            break pos;
        }
        if buf.len() > MAX_HEAD_BYTES {
            return Ok(Some(Err(Response::detail(400, "Request head too large"))));
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Ok(Some(Err(Response::detail(400, "Incomplete request"))));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut request = match parse_head(&head) {
        Some(request) => request,
        None => return Ok(Some(Err(Response::detail(400, "Invalid request line")))),
    };

    let content_length = match body_length(&request) {
        Ok(length) => length,
        Err(response) => return Ok(Some(Err(response))),
    };

    let mut body = buf[head_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Some(Err(Response::detail(400, "Incomplete request body"))));
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);
    request.body = body;

    Ok(Some(Ok(request)))
}

/// Declared body length, or the response rejecting the framing
fn body_length(request: &Request) -> std::result::Result<usize, Response> {
    if request.headers.contains_key("transfer-encoding") {
        return Err(Response::detail(411, "Chunked request bodies are not supported; send Content-Length"));
    }

    let length = match request.headers.get("content-length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| Response::detail(400, format!("Invalid Content-Length '{}'", value)))?,
        None if request.method.eq_ignore_ascii_case("POST") => {
            return Err(Response::detail(411, "Content-Length is required"));
        }
        None => 0,
    };

    if length > MAX_BODY_BYTES {
        return Err(Response::detail(413, "Request body too large"));
    }
    Ok(length)
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Parse request line and headers
fn parse_head(head: &str) -> Option<Request> {
    let mut lines = head.split("\r\n");

    let request_line = lines.next()?;
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    let method = parts[0].to_string();
    let path = parts[1].split_once('?').map_or(parts[1], |(path, _)| path).to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    Some(Request { method, path, headers, body: Vec::new() })
}

/// Run the generator server from CLI arguments until Ctrl+C
pub async fn run_server(config: &ServerConfig, options: CodegenOptions) -> Result<()> {
    let server = GeneratorServer::bind(config, options).await?;
    eprintln!("apisnip listening on http://{}", server.local_addr()?);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        })
        .await
}
