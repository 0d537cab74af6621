//! Shared test utilities for photoframe-core integration tests.
//!
//! [`FakeFrame`] is an in-memory device implementing [`Transport`]: it keeps
//! a virtual folder tree, answers the device endpoints the way the frame
//! does, records every request, and can be told to fail specific requests.

// Each integration test is compiled as its own crate, so not every test file
// uses every function from this shared module. Suppress dead_code warnings.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Cursor;
use std::sync::Mutex;

use percent_encoding::percent_decode_str;
use photoframe_core::transport::{RequestBody, ResponseBody, Transport};
use photoframe_core::FrameError;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

/// One request as seen by the fake device, query values decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: &'static str,
    pub endpoint: String,
    pub params: Vec<(String, String)>,
    pub raw: String,
}

impl Request {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A received upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub target: String,
    pub content_type: String,
    pub length: u64,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct State {
    /// Folder path (always ending in `/`) to child paths in creation order.
    dirs: BTreeMap<String, Vec<String>>,
    files: BTreeMap<String, Vec<u8>>,
    requests: Vec<Request>,
    uploads: Vec<Upload>,
    failing: HashSet<String>,
    listing_overrides: HashMap<String, String>,
    reply_overrides: HashMap<String, Vec<u8>>,
    broken_bodies: HashSet<String>,
}

/// In-memory photo frame.
pub struct FakeFrame {
    state: Mutex<State>,
}

impl Default for FakeFrame {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeFrame {
    /// A device with only the root folder `/`.
    pub fn new() -> Self {
        let mut state = State::default();
        state.dirs.insert("/".to_string(), Vec::new());
        Self {
            state: Mutex::new(state),
        }
    }

    /// Add a folder (path ending in `/`), creating missing parents.
    pub fn with_dir(self, path: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            add_dir(&mut state, &dir_key(path));
        }
        self
    }

    /// Add a file, creating missing parent folders.
    pub fn with_file(self, path: &str, data: &[u8]) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let parent = parent_of(path);
            add_dir(&mut state, &parent);
            if state.files.insert(path.to_string(), data.to_vec()).is_none() {
                state
                    .dirs
                    .get_mut(&parent)
                    .unwrap()
                    .push(path.to_string());
            }
        }
        self
    }

    /// Answer the exact request target `raw` with HTTP 500.
    pub fn fail_on(self, raw: &str) -> Self {
        self.state.lock().unwrap().failing.insert(raw.to_string());
        self
    }

    /// Answer listings of `folder` with `body` instead of the real tree.
    pub fn with_listing_body(self, folder: &str, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .listing_overrides
            .insert(folder.to_string(), body.to_string());
        self
    }

    /// Answer the exact request target `raw` with `body` once the request
    /// has taken effect. The body need not be UTF-8.
    pub fn with_reply_body(self, raw: &str, body: impl Into<Vec<u8>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .reply_overrides
            .insert(raw.to_string(), body.into());
        self
    }

    /// Make the body of `raw` fail with a reset after its first bytes.
    pub fn with_broken_body(self, raw: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .broken_bodies
            .insert(raw.to_string());
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.state.lock().unwrap().uploads.clone()
    }

    /// `(endpoint, path)` for every request carrying a `path` parameter.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.requests()
            .into_iter()
            .filter_map(|r| {
                let path = r.param("path")?.to_string();
                Some((r.endpoint, path))
            })
            .collect()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.endpoint == endpoint)
            .count()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.state.lock().unwrap().dirs.contains_key(&dir_key(path))
    }

    pub fn has_file(&self, path: &str) -> bool {
        self.state.lock().unwrap().files.contains_key(path)
    }

    fn record(&self, method: &'static str, raw: &str) -> Result<Request, FrameError> {
        let (endpoint, query) = raw.split_once('?').unwrap_or((raw, ""));
        let params = query
            .split('&')
            .filter(|p| !p.is_empty())
            .map(|p| {
                let (k, v) = p.split_once('=').unwrap_or((p, ""));
                (k.to_string(), decode(v))
            })
            .collect();
        let request = Request {
            method,
            endpoint: endpoint.to_string(),
            params,
            raw: raw.to_string(),
        };

        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if state.failing.contains(raw) {
            return Err(status(500, raw));
        }
        Ok(request)
    }

    fn handle_get(&self, request: &Request) -> Result<Vec<u8>, FrameError> {
        let mut state = self.state.lock().unwrap();
        let raw = request.raw.as_str();
        let path = request.param("path").unwrap_or_default().to_string();

        match request.endpoint.as_str() {
            "/list" => {
                if let Some(body) = state.listing_overrides.get(&path) {
                    return Ok(body.clone().into_bytes());
                }
                let key = dir_key(&path);
                let children = state.dirs.get(&key).ok_or_else(|| status(404, raw))?;
                let mut xml = format!("<?xml version=\"1.0\"?>\n<list path=\"{key}\">\n");
                for child in children {
                    let tag = if child.ends_with('/') { "dir" } else { "file" };
                    xml.push_str(&format!("<{tag}>{}</{tag}>\n", escape(name_of(child))));
                }
                xml.push_str("</list>\n");
                Ok(xml.into_bytes())
            }
            "/get" => state
                .files
                .get(&path)
                .cloned()
                .ok_or_else(|| status(404, raw)),
            "/delete" => {
                if state.files.remove(&path).is_some() {
                    detach(&mut state, &path);
                    return Ok(b"OK\n".to_vec());
                }
                let key = dir_key(&path);
                match state.dirs.get(&key).map(Vec::len) {
                    Some(n) if n > 0 => Err(status(409, raw)),
                    Some(_) if key == "/" => Err(status(403, raw)),
                    Some(_) => {
                        state.dirs.remove(&key);
                        detach(&mut state, &key);
                        Ok(b"OK\n".to_vec())
                    }
                    None => Err(status(404, raw)),
                }
            }
            "/mkdir" => {
                add_dir(&mut state, &dir_key(&path));
                Ok(b"OK\n".to_vec())
            }
            "/rename" => Ok(b"OK\n".to_vec()),
            "/filesystems" => Ok(b"<filesystems>\n<fs name=\"internal\" free=\"100\"/>\n</filesystems>\n".to_vec()),
            _ => Err(status(404, raw)),
        }
    }
}

#[async_trait::async_trait]
impl Transport for FakeFrame {
    async fn get(&self, path_and_query: &str) -> Result<ResponseBody, FrameError> {
        let request = self.record("GET", path_and_query)?;
        let body = self.handle_get(&request)?;

        let state = self.state.lock().unwrap();
        let body = state
            .reply_overrides
            .get(path_and_query)
            .cloned()
            .unwrap_or(body);
        if state.broken_bodies.contains(path_and_query) {
            return Ok(Box::new(Cursor::new(body).chain(ResetReader)));
        }
        Ok(Box::new(Cursor::new(body)))
    }

    async fn post(
        &self,
        path_and_query: &str,
        mut body: RequestBody,
        length: u64,
        content_type: &str,
    ) -> Result<ResponseBody, FrameError> {
        let request = self.record("POST", path_and_query)?;
        let mut received = Vec::new();
        body.read_to_end(&mut received).await?;

        let target = request.param("path").unwrap_or_default().to_string();
        let mut state = self.state.lock().unwrap();
        state.uploads.push(Upload {
            target,
            content_type: content_type.to_string(),
            length,
            body: received,
        });
        Ok(Box::new(Cursor::new(b"File uploaded\n".to_vec())))
    }
}

fn status(code: u16, raw: &str) -> FrameError {
    FrameError::Status {
        status: code,
        path: raw.to_string(),
    }
}

fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

fn escape(name: &str) -> String {
    name.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn dir_key(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

fn parent_of(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(i) => trimmed[..=i].to_string(),
        None => "/".to_string(),
    }
}

fn name_of(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn add_dir(state: &mut State, key: &str) {
    if state.dirs.contains_key(key) {
        return;
    }
    let parent = parent_of(key);
    add_dir(state, &parent);
    state.dirs.insert(key.to_string(), Vec::new());
    state.dirs.get_mut(&parent).unwrap().push(key.to_string());
}

fn detach(state: &mut State, path: &str) {
    let parent = parent_of(path);
    if let Some(children) = state.dirs.get_mut(&parent) {
        children.retain(|c| c != path);
    }
}

/// Payload reader that records when it is dropped.
pub struct TrackedPayload {
    inner: Cursor<Vec<u8>>,
    dropped: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

impl TrackedPayload {
    pub fn new(data: Vec<u8>) -> (Self, std::sync::Arc<std::sync::atomic::AtomicUsize>) {
        let dropped = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        (
            Self {
                inner: Cursor::new(data),
                dropped: dropped.clone(),
            },
            dropped,
        )
    }
}

impl Drop for TrackedPayload {
    fn drop(&mut self) {
        self.dropped
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

impl AsyncRead for TrackedPayload {
    fn poll_read(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::pin::Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

/// Reader that fails every read, like a connection reset mid-body.
struct ResetReader;

impl AsyncRead for ResetReader {
    fn poll_read(
        self: std::pin::Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        std::task::Poll::Ready(Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by device",
        )))
    }
}
