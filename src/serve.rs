//! Live server.
//!
//! Renders pages on demand, built on `tiny_http`:
//!
//! | Route | Response |
//! |-------|----------|
//! | `/`, `/index.html` | Index page |
//! | `/scenarioaday/<path>` | The entry whose url equals the request path, else 404 |
//! | `/static/<path>` | `<static_dir>/<path>` verbatim, else 404 |
//! | anything else | 404 |
//!
//! Every request walks the content root again, so edits show up on the next
//! reload with no cache to invalidate. Requests are handed to the rayon pool
//! and share nothing mutable; on Ctrl+C the loop stops accepting and waits
//! for in-flight requests. Walk or render failures answer 500 with the
//! error text.
//!
//! Unmatched paths answer 404 rather than falling back to the index, so the
//! server never returns a page the static export has no file for.
//!
//! Routing is the pure [`route`] function; the socket loop only adapts its
//! [`Reply`] to a `tiny_http` response.

use crate::site::Site;
use log::{debug, info, warn};
use std::borrow::Cow;
use std::fmt::Display;
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;
use thiserror::Error;
use tiny_http::{Header, Method, Request, Response, Server};

pub const ENTRY_PREFIX: &str = "/scenarioaday/";
pub const STATIC_PREFIX: &str = "/static/";

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot listen on {addr}: {message}")]
    Bind { addr: String, message: String },
    #[error("cannot install Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

/// A response ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    fn html(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body,
        }
    }

    fn text(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    fn not_found() -> Self {
        Self::text(404, "not found")
    }

    fn method_not_allowed() -> Self {
        Self::text(405, "method not allowed")
    }

    fn internal_error(err: impl Display) -> Self {
        Self::text(500, format!("Internal Error: {err}"))
    }
}

/// Serve `site` on `listen` until Ctrl+C.
///
/// `listen` takes `host:port`; a bare `:port` binds every interface.
pub fn serve(site: Site, listen: &str) -> Result<(), ServeError> {
    let addr = normalize_listen_addr(listen);
    let server = Server::http(addr.as_str()).map_err(|err| ServeError::Bind {
        addr: addr.clone(),
        message: err.to_string(),
    })?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        info!("shutting down...");
        server_for_signal.unblock();
    })?;

    info!("Listening on http://{addr}");
    serve_requests(&server, &site);
    Ok(())
}

/// Answer requests on the rayon pool until the server is unblocked, then
/// wait for the ones still in flight.
pub fn serve_requests(server: &Server, site: &Site) {
    rayon::in_place_scope(|scope| {
        for request in server.incoming_requests() {
            scope.spawn(move |_| {
                if let Err(err) = handle_request(request, site) {
                    warn!("request error: {err}");
                }
            });
        }
    });
}

/// Expand the `:port` shorthand to an all-interfaces address.
pub fn normalize_listen_addr(listen: &str) -> String {
    if listen.starts_with(':') {
        format!("0.0.0.0{listen}")
    } else {
        listen.to_string()
    }
}

fn handle_request(request: Request, site: &Site) -> Result<(), ServeError> {
    let reply = match request.method() {
        Method::Get | Method::Head => route(site, request.url()),
        _ => Reply::method_not_allowed(),
    };
    info!("{} {} -> {}", request.method(), request.url(), reply.status);

    let mut response = Response::from_data(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes("Content-Type", reply.content_type) {
        response.add_header(header);
    }
    request.respond(response)?;
    Ok(())
}

/// Resolve a request target (path plus optional query) to a reply.
pub fn route(site: &Site, target: &str) -> Reply {
    let raw_path = target.split(['?', '#']).next().unwrap_or_default();
    let path = urlencoding::decode(raw_path).unwrap_or(Cow::Borrowed(raw_path));
    debug!("routing {path}");

    if path == "/" || path == "/index.html" {
        return index_reply(site);
    }
    if path.starts_with(ENTRY_PREFIX) {
        return entry_reply(site, &path);
    }
    match path.strip_prefix(STATIC_PREFIX) {
        Some(relative) => static_reply(site, relative),
        None => Reply::not_found(),
    }
}

fn index_reply(site: &Site) -> Reply {
    let entries = match site.entries() {
        Ok(entries) => entries,
        Err(err) => return Reply::internal_error(err),
    };
    let mut body = Vec::new();
    match site.write_index(&entries, &mut body) {
        Ok(()) => Reply::html(body),
        Err(err) => Reply::internal_error(err),
    }
}

fn entry_reply(site: &Site, path: &str) -> Reply {
    let entries = match site.entries() {
        Ok(entries) => entries,
        Err(err) => return Reply::internal_error(err),
    };
    entries
        .into_iter()
        .find(|entry| entry.url == path)
        .map(|entry| Reply::html(entry.page.into_bytes()))
        .unwrap_or_else(Reply::not_found)
}

fn static_reply(site: &Site, relative: &str) -> Reply {
    let relative = Path::new(relative);
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !contained {
        return Reply::not_found();
    }

    let path = site.static_dir().join(relative);
    if !path.is_file() {
        return Reply::not_found();
    }
    match fs::read(&path) {
        Ok(body) => Reply {
            status: 200,
            content_type: guess_content_type(&path),
            body,
        },
        Err(err) => Reply::internal_error(err),
    }
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        _ => "application/octet-stream",
    }
}
