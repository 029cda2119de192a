use crate::classification_client::wire::{ResultEntry, UploadRequest, UploadResponse};
use crate::emotion::Emotion;
use crate::library::logger::interface::Logger;
use crate::stress_verdict::STRESS_THRESHOLD;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Method, Request, Response, Server};

/// Picks a label for frame `index` given its decoded JPEG bytes.
pub type Labeler = Arc<dyn Fn(usize, &[u8]) -> Option<Emotion> + Send + Sync>;

const FRAME_ERROR: &str = "Error in processing frame";

#[derive(Debug, thiserror::Error)]
pub enum FakeEndpointError {
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("server address is not an IP socket")]
    UnsupportedAddress,
}

enum Reply {
    Classify(Labeler),
    Fixed { status: u16, body: String },
}

/// A local stand-in for the classification endpoint, serving `POST /upload`.
pub struct FakeEndpoint {
    server: Arc<Server>,
    addr: SocketAddr,
    served: Arc<AtomicUsize>,
    join: Option<thread::JoinHandle<()>>,
}

impl FakeEndpoint {
    #[allow(dead_code)]
    pub fn start(bind: &str, labeler: Labeler) -> Result<Self, FakeEndpointError> {
        Self::spawn(bind, Reply::Classify(labeler), None)
    }

    /// Answers every request with the same status and body.
    #[allow(dead_code)]
    pub fn start_fixed(bind: &str, status: u16, body: &str) -> Result<Self, FakeEndpointError> {
        Self::spawn(
            bind,
            Reply::Fixed {
                status,
                body: body.to_string(),
            },
            None,
        )
    }

    pub fn start_logged(
        bind: &str,
        labeler: Labeler,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, FakeEndpointError> {
        Self::spawn(
            bind,
            Reply::Classify(labeler),
            Some(logger.with_namespace("fake_endpoint")),
        )
    }

    fn spawn(
        bind: &str,
        reply: Reply,
        logger: Option<Arc<dyn Logger + Send + Sync>>,
    ) -> Result<Self, FakeEndpointError> {
        let server = Arc::new(Server::http(bind).map_err(|e| FakeEndpointError::Bind {
            addr: bind.to_string(),
            reason: e.to_string(),
        })?);
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or(FakeEndpointError::UnsupportedAddress)?;
        let served = Arc::new(AtomicUsize::new(0));

        let server_clone = server.clone();
        let served_clone = served.clone();
        let join = thread::spawn(move || {
            for request in server_clone.incoming_requests() {
                let line = format!("{} {}", request.method(), request.url());
                served_clone.fetch_add(1, Ordering::SeqCst);
                let result = handle(request, &reply);
                if let Some(logger) = &logger {
                    let _ = match result {
                        Ok(()) => logger.info(&line),
                        Err(e) => logger.error(&format!("{}: {}", line, e)),
                    };
                }
            }
        });

        Ok(Self {
            server,
            addr,
            served,
            join: Some(join),
        })
    }

    #[allow(dead_code)]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn upload_url(&self) -> String {
        format!("http://{}/upload", self.addr)
    }

    #[allow(dead_code)]
    pub fn requests_served(&self) -> usize {
        self.served.load(Ordering::SeqCst)
    }

    /// Blocks until the server stops accepting requests.
    pub fn wait(mut self) {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for FakeEndpoint {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

fn json_response(status: u16, body: String) -> Response<std::io::Cursor<Vec<u8>>> {
    let response = Response::from_string(body).with_status_code(status);
    match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => response.with_header(header),
        Err(()) => response,
    }
}

fn handle(mut request: Request, reply: &Reply) -> std::io::Result<()> {
    let labeler = match reply {
        Reply::Fixed { status, body } => {
            return request.respond(json_response(*status, body.clone()));
        }
        Reply::Classify(labeler) => labeler,
    };

    let route = (request.method().clone(), request.url().to_string());
    match (&route.0, route.1.as_str()) {
        (Method::Get, "/") => request.respond(json_response(
            200,
            r#"{"message":"fake emotion classification endpoint"}"#.to_string(),
        )),
        (Method::Post, "/upload") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let response = classify_body(&body, labeler);
            let text = serde_json::to_string(&response).unwrap_or_default();
            request.respond(json_response(200, text))
        }
        _ => request.respond(json_response(404, r#"{"message":"not found"}"#.to_string())),
    }
}

fn classify_body(body: &str, labeler: &Labeler) -> UploadResponse {
    let upload: UploadRequest = match serde_json::from_str(body) {
        Ok(upload) => upload,
        Err(e) => {
            return UploadResponse {
                status: Some("error".to_string()),
                message: Some(e.to_string()),
                ..Default::default()
            }
        }
    };

    let results: Vec<ResultEntry> = upload
        .frames
        .iter()
        .enumerate()
        .map(|(index, data_url)| {
            decode_data_url(data_url)
                .and_then(|jpeg| labeler(index, &jpeg))
                .map(ResultEntry::emotion)
                .unwrap_or_else(|| ResultEntry::error(FRAME_ERROR))
        })
        .collect();

    let stress_count = results
        .iter()
        .filter_map(|entry| entry.emotion.as_deref())
        .filter_map(|label| label.parse::<Emotion>().ok())
        .filter(Emotion::is_stress)
        .count();

    UploadResponse {
        status: Some("success".to_string()),
        message: None,
        results: Some(results),
        is_stressed: Some(stress_count > STRESS_THRESHOLD),
    }
}

fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let (_, payload) = data_url.split_once(',')?;
    STANDARD.decode(payload).ok()
}

/// Labels frames uniformly at random.
pub fn random_labeler() -> Labeler {
    Arc::new(|_: usize, _: &[u8]| {
        use rand::Rng;
        let index = rand::rng().random_range(0..Emotion::ALL.len());
        Some(Emotion::ALL[index])
    })
}
