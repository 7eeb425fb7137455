// ABOUTME: HTTP server module for the reveal-deck application
// ABOUTME: Serves the project directory (rendered slides and submodule assets) over plain HTTP

use log::{debug, error, info};
use std::fs::File;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, ResponseBox, Server, StatusCode};
use url::Url;

use crate::errors::{DeckError, Result};
use crate::html;
use crate::utils;

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// What a request maps to inside the served directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Stream a file from disk
    File {
        path: PathBuf,
        content_type: &'static str,
    },
    /// A generated HTML page (directory listing or error)
    Page { status: u16, body: String },
    /// Redirect, used to add the trailing slash to directory URLs
    Redirect { location: String },
}

impl Reply {
    fn not_found() -> Self {
        Reply::Page {
            status: 404,
            body: html::generate_error_page(404, "File not found"),
        }
    }

    fn not_implemented(method: &Method) -> Self {
        Reply::Page {
            status: 501,
            body: html::generate_error_page(501, &format!("Unsupported method ({})", method)),
        }
    }

    /// HTTP status this reply will be sent with
    pub fn status(&self) -> u16 {
        match self {
            Reply::File { .. } => 200,
            Reply::Page { status, .. } => *status,
            Reply::Redirect { .. } => 301,
        }
    }

    fn into_response(self) -> (u16, ResponseBox) {
        match self {
            Reply::File { path, content_type } => match File::open(&path) {
                Ok(file) => {
                    let mut response = Response::from_file(file);
                    if let Some(header) = header("Content-Type", content_type) {
                        response = response.with_header(header);
                    }
                    (200, response.boxed())
                }
                Err(e) => {
                    error!("Failed to open file {:?}: {}", path, e);
                    Reply::not_found().into_response()
                }
            },
            Reply::Page { status, body } => {
                let mut response =
                    Response::from_string(body).with_status_code(StatusCode(status));
                if let Some(header) = header("Content-Type", "text/html; charset=utf-8") {
                    response = response.with_header(header);
                }
                (status, response.boxed())
            }
            Reply::Redirect { location } => {
                let mut response = Response::empty(StatusCode(301));
                if let Some(header) = header("Location", &location) {
                    response = response.with_header(header);
                }
                (301, response.boxed())
            }
        }
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

/// Lets another thread stop a running [`SlideServer`]
#[derive(Clone)]
pub struct ShutdownHandle {
    server: Arc<Server>,
}

impl ShutdownHandle {
    /// Make `serve_forever` return after the request in flight, if any
    pub fn shutdown(&self) {
        self.server.unblock();
    }
}

/// A static file server rooted at one directory
pub struct SlideServer {
    server: Arc<Server>,
    root: PathBuf,
    host: String,
}

impl SlideServer {
    /// Bind a listener on `host:port` that will serve files under `root`
    pub fn bind(host: &str, port: u16, root: &Path) -> Result<Self> {
        utils::validate_directory_exists(root)?;
        let root = utils::get_absolute_path(root)?;

        let addr = format!("{}:{}", host, port);
        let server = Server::http(addr.as_str()).map_err(|e| DeckError::ServerBind {
            addr: addr.clone(),
            message: e.to_string(),
        })?;
        debug!("Bound {} serving {:?}", addr, root);

        Ok(Self {
            server: Arc::new(server),
            root,
            host: host.to_string(),
        })
    }

    /// Address actually bound, useful when binding port 0
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Directory being served
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            server: self.server.clone(),
        }
    }

    /// Handle requests on the calling thread until shut down or interrupted
    pub fn serve_forever(&self) -> Result<()> {
        let port = self.local_addr().map(|a| a.port()).unwrap_or_default();
        println!("serving at http://{}:{}", self.host, port);
        info!("Serving {:?} on {}:{}", self.root, self.host, port);

        for request in self.server.incoming_requests() {
            self.handle(request);
        }

        info!("HTTP server stopped");
        Ok(())
    }

    fn handle(&self, request: Request) {
        let peer = request
            .remote_addr()
            .map(|a| a.ip().to_string())
            .unwrap_or_else(|| "-".to_string());
        let line = format!("{} {}", request.method(), request.url());

        let reply = resolve_request(&self.root, request.method(), request.url());
        let (status, response) = reply.into_response();
        info!("{} \"{}\" {}", peer, line, status);

        if let Err(e) = request.respond(response) {
            error!("Failed to send response: {}", e);
        }
    }
}

/// Map a request to a reply, without touching the network.
///
/// Query strings and fragments are ignored. Segments are percent-decoded and
/// any empty, `.` or `..` component is dropped, so the result always stays
/// inside `root`.
pub fn resolve_request(root: &Path, method: &Method, target: &str) -> Reply {
    if !matches!(method, Method::Get | Method::Head) {
        return Reply::not_implemented(method);
    }

    let Some(url) = parse_target(target) else {
        return Reply::not_found();
    };

    let raw_path = url.path();
    let mut file_path = root.to_path_buf();
    for segment in decoded_segments(raw_path) {
        file_path.push(segment);
    }

    if file_path.is_dir() {
        if !raw_path.ends_with('/') {
            let mut location = format!("{}/", raw_path);
            if let Some(query) = url.query() {
                location.push('?');
                location.push_str(query);
            }
            return Reply::Redirect { location };
        }

        for index in INDEX_FILES {
            let candidate = file_path.join(index);
            if candidate.is_file() {
                return Reply::File {
                    content_type: content_type_for_path(&candidate),
                    path: candidate,
                };
            }
        }

        return match html::read_listing(&file_path) {
            Ok(entries) => {
                let display = urlencoding::decode(raw_path)
                    .map(|p| p.into_owned())
                    .unwrap_or_else(|_| raw_path.to_string());
                Reply::Page {
                    status: 200,
                    body: html::generate_listing(&display, &entries),
                }
            }
            Err(e) => {
                debug!("Cannot list {:?}: {}", file_path, e);
                Reply::not_found()
            }
        };
    }

    // A trailing slash only names directories
    if file_path.is_file() && !raw_path.ends_with('/') {
        return Reply::File {
            content_type: content_type_for_path(&file_path),
            path: file_path,
        };
    }

    Reply::not_found()
}

/// Parse an origin-form (`/a/b?c`) or absolute-form request target
fn parse_target(target: &str) -> Option<Url> {
    if target.starts_with('/') {
        Url::parse(&format!("http://localhost{}", target)).ok()
    } else {
        Url::parse(target).ok()
    }
}

/// Percent-decode a URL path into safe filesystem components
fn decoded_segments(raw_path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for raw in raw_path.split('/') {
        let decoded = match urlencoding::decode(raw) {
            Ok(d) => d.into_owned(),
            Err(_) => raw.to_string(),
        };
        // A decoded segment may itself contain separators (`..%2f`)
        for part in decoded.split(['/', '\\']) {
            let part = part.trim_end_matches('\0');
            let unsafe_drive = cfg!(windows) && part.contains(':');
            if part.is_empty() || part == "." || part == ".." || unsafe_drive {
                continue;
            }
            segments.push(part.to_string());
        }
    }
    segments
}

/// Guess a content type from the file extension
pub fn content_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "json" | "map" => "application/json; charset=utf-8",
        "txt" | "md" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
