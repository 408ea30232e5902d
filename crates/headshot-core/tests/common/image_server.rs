//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed table of paths: images, soft-404 pages, redirects and
//! deliberately slow responses. Unknown paths answer 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Route {
    Body {
        status: u16,
        content_type: &'static str,
        body: Vec<u8>,
    },
    Redirect(String),
    /// Sleeps before answering with the wrapped route.
    Slow(Duration, Box<Route>),
}

impl Route {
    pub fn png(width: u32, height: u32) -> Self {
        Route::Body {
            status: 200,
            content_type: "image/png",
            body: encode_png(width, height),
        }
    }

    pub fn html(status: u16, html: &str) -> Self {
        Route::Body {
            status,
            content_type: "text/html; charset=utf-8",
            body: html.as_bytes().to_vec(),
        }
    }

    pub fn bytes(content_type: &'static str, body: Vec<u8>) -> Self {
        Route::Body {
            status: 200,
            content_type,
            body,
        }
    }
}

pub fn encode_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 90, 160]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).expect("encode png");
    out.into_inner()
}

pub struct ImageServer {
    pub base: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl ImageServer {
    /// Absolute URL for `path` (which must start with '/').
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Request paths received so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread. The server runs until the
/// process exits.
pub fn start(routes: Vec<(&str, Route)>) -> ImageServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}", port);
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let hits = Arc::new(Mutex::new(Vec::new()));
    let server_hits = Arc::clone(&hits);
    let server_base = base.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let hits = Arc::clone(&server_hits);
            let base = server_base.clone();
            thread::spawn(move || handle(stream, &routes, &hits, &base));
        }
    });
    ImageServer { base, hits }
}

fn handle(
    mut stream: TcpStream,
    routes: &HashMap<String, Route>,
    hits: &Mutex<Vec<String>>,
    base: &str,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    hits.lock().unwrap().push(path.clone());

    match settle(routes.get(&path).cloned()) {
        Some(Route::Body {
            status,
            content_type,
            body,
        }) => respond(&mut stream, status, content_type, &body),
        Some(Route::Redirect(target)) => {
            let location = if target.starts_with('/') {
                format!("{base}{target}")
            } else {
                target
            };
            let response = format!(
                "HTTP/1.1 302 Found\r\nLocation: {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                location
            );
            let _ = stream.write_all(response.as_bytes());
        }
        _ => respond(&mut stream, 404, "text/html", b"<h1>Not Found</h1>"),
    }
}

/// Apply any `Slow` wrappers, sleeping for each.
fn settle(route: Option<Route>) -> Option<Route> {
    match route {
        Some(Route::Slow(delay, inner)) => {
            thread::sleep(delay);
            settle(Some(*inner))
        }
        other => other,
    }
}

fn respond(stream: &mut TcpStream, status: u16, content_type: &str, body: &[u8]) {
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        _ => "Status",
    };
    let header = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        content_type,
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(body);
}
