//! HTTP surface for the registry
//!
//! An http1 hyper server with one spawned task per connection. Routing is
//! a small match over method and path; all registration semantics live in
//! the admission gate and all query semantics in the stats engine, so the
//! handlers here only translate between wire conventions and core types.

mod query;

pub use query::{first, parse_pairs};

use std::convert::Infallible;
use std::net::IpAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, error};

use crate::admission::{unix_now, AdmissionGate};
use crate::config::V1FailureMode;
use crate::constants::{admission::RATE_LIMIT_REASON, query::BADLY_FORMED};
use crate::error::RegistryError;
use crate::station::RawRegistration;
use crate::stats::{ListError, StatsEngine, TimeParams};

/// Shared handler state for the HTTP surface
pub struct RegistryServer {
    gate: Arc<AdmissionGate>,
    stats: Arc<StatsEngine>,
    v1_failure_mode: V1FailureMode,
}

impl RegistryServer {
    pub fn new(
        gate: Arc<AdmissionGate>,
        stats: Arc<StatsEngine>,
        v1_failure_mode: V1FailureMode,
    ) -> Self {
        Self {
            gate,
            stats,
            v1_failure_mode,
        }
    }

    /// Accept loop: one detached task per connection
    pub async fn run(self: Arc<Self>, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("failed to accept connection: {}", e);
                    continue;
                }
            };
            let server = self.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req: Request<Incoming>| {
                    let server = server.clone();
                    async move { server.route(req, peer.ip()).await }
                });
                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("connection from {} ended with error: {}", peer, e);
                }
            });
        }
    }

    /// Dispatch one request. Never fails: every outcome is an HTTP response.
    pub async fn route(
        &self,
        req: Request<Incoming>,
        peer: IpAddr,
    ) -> Result<Response<Full<Bytes>>, Infallible> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let raw_query = req.uri().query().unwrap_or("").to_string();

        let response = match (method, path.as_str()) {
            (Method::GET, "/api/v1/stations") => self.register_v1(&raw_query, peer).await,
            (Method::POST, "/api/v2/stations") => self.register_v2(req, peer).await,
            (Method::GET, "/api/v2/stations") => self.list_v2(&raw_query).await,
            (Method::GET, path) if path.starts_with("/api/v2/stats/") => {
                let info_type = &path["/api/v2/stats/".len()..];
                self.stats_v2(info_type, &raw_query).await
            }
            _ => text(StatusCode::NOT_FOUND, "Not Found"),
        };
        Ok(response)
    }

    /// Legacy v1 registration via query parameters.
    ///
    /// Success is a 200 with an empty body. Failure reporting depends on
    /// the configured generation: the current one signals validation
    /// failures in the body with a `FAIL. ` prefix and a 200 status, the
    /// older one used a 400 status with the bare reason.
    async fn register_v1(&self, raw_query: &str, peer: IpAddr) -> Response<Full<Bytes>> {
        let raw = RawRegistration::from_pairs(parse_pairs(raw_query));
        match self.gate.register(&raw, peer).await {
            Ok(_) => text(StatusCode::OK, ""),
            Err(RegistryError::Validation(failure)) => match self.v1_failure_mode {
                V1FailureMode::FailBody => {
                    text(StatusCode::OK, format!("FAIL. {}", failure))
                }
                V1FailureMode::StatusCode => {
                    text(StatusCode::BAD_REQUEST, failure.to_string())
                }
            },
            Err(RegistryError::RateLimited { .. }) => {
                let body = match self.v1_failure_mode {
                    V1FailureMode::FailBody => format!("FAIL. {}", RATE_LIMIT_REASON),
                    V1FailureMode::StatusCode => RATE_LIMIT_REASON.to_string(),
                };
                text(StatusCode::TOO_MANY_REQUESTS, body)
            }
            Err(RegistryError::Storage(e)) => storage_failure(e),
        }
    }

    /// Current-generation registration with a JSON body
    async fn register_v2(&self, req: Request<Incoming>, peer: IpAddr) -> Response<Full<Bytes>> {
        let body = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                debug!("failed to read v2 body: {}", e);
                return text(StatusCode::OK, format!("FAIL. {}", BADLY_FORMED));
            }
        };
        let json: serde_json::Value = match serde_json::from_slice(&body) {
            Ok(serde_json::Value::Object(map)) => serde_json::Value::Object(map),
            _ => return text(StatusCode::OK, format!("FAIL. {}", BADLY_FORMED)),
        };

        let raw = RawRegistration::from_json(&json);
        match self.gate.register(&raw, peer).await {
            Ok(_) => text(StatusCode::OK, ""),
            Err(RegistryError::Validation(failure)) => {
                text(StatusCode::OK, format!("FAIL. {}", failure))
            }
            Err(RegistryError::RateLimited { .. }) => text(
                StatusCode::TOO_MANY_REQUESTS,
                format!("FAIL. {}", RATE_LIMIT_REASON),
            ),
            Err(RegistryError::Storage(e)) => storage_failure(e),
        }
    }

    /// `GET /api/v2/stations?since=&max_age=&limit=`
    async fn list_v2(&self, raw_query: &str) -> Response<Full<Bytes>> {
        let pairs = parse_pairs(raw_query);
        let time = time_params(&pairs);

        let limit = match first(&pairs, "limit") {
            Some(text) => match text.parse::<usize>() {
                Ok(limit) => Some(limit),
                Err(_) => return text_response_badly_formed(),
            },
            None => None,
        };

        match self.stats.list(&time, limit, unix_now()).await {
            Ok(records) => json(StatusCode::OK, &records),
            Err(ListError::Query(e)) => {
                debug!("malformed listing request: {}", e);
                text_response_badly_formed()
            }
            Err(ListError::Storage(e)) => storage_failure(e),
        }
    }

    /// `GET /api/v2/stats/<info_type>?since=&max_age=&consolidate=`
    async fn stats_v2(&self, info_type: &str, raw_query: &str) -> Response<Full<Bytes>> {
        let field = match info_type.parse() {
            Ok(field) => field,
            Err(e) => {
                debug!("rejected stats request: {}", e);
                return text_response_badly_formed();
            }
        };

        let pairs = parse_pairs(raw_query);
        let time = time_params(&pairs);
        let consolidate = first(&pairs, "consolidate")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        match self.stats.stats(field, &time, consolidate, unix_now()).await {
            Ok(series) => json(StatusCode::OK, &series),
            Err(ListError::Query(e)) => {
                debug!("malformed stats request: {}", e);
                text_response_badly_formed()
            }
            Err(ListError::Storage(e)) => storage_failure(e),
        }
    }
}

fn time_params(pairs: &[(String, String)]) -> TimeParams {
    TimeParams {
        since: first(pairs, "since").map(str::to_string),
        max_age: first(pairs, "max_age").map(str::to_string),
    }
}

fn text(status: StatusCode, body: impl Into<String>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body.into())))
        .expect("static response parts are valid")
}

fn text_response_badly_formed() -> Response<Full<Bytes>> {
    text(StatusCode::BAD_REQUEST, BADLY_FORMED)
}

fn json<T: serde::Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => Response::builder()
            .status(status)
            .header("Content-Type", "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("static response parts are valid"),
        Err(e) => {
            error!("failed to serialize response: {}", e);
            text(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}

fn storage_failure(e: crate::store::StoreError) -> Response<Full<Bytes>> {
    error!("storage failure: {}", e);
    text(StatusCode::INTERNAL_SERVER_ERROR, "Storage failure")
}
