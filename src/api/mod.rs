//! Content API client and models
//!
//! This module handles communication with the content backend:
//! the transport seam, response classification, data models and
//! the typed client operations built on top of them.

pub mod classifier;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ContentApiClient;
pub use error::{ApiError, ApiResult};
pub use models::{ContentObject, ContentType, MediaPayload, Page};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
