//! Transport-agnostic `getImageBordereau` handler.
//!
//! Any HTTP host can mount [`ImageEndpoint::handle_query`] on [`ROUTE`]; the
//! response is either `200 image/png` or `204 No Content`, never an error body.

use url::form_urlencoded;

use crate::http::HttpClient;
use crate::pipeline::{BordereauPipeline, Outcome};

pub const ROUTE: &str = "/getImageBordereau";
pub const PARCEL_PARAM: &str = "parcelle";

pub const STATUS_OK: u16 = 200;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Status, content type and body handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResponse {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl EndpointResponse {
    pub fn png(body: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            content_type: Some(PNG_CONTENT_TYPE),
            body,
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: STATUS_NO_CONTENT,
            content_type: None,
            body: Vec::new(),
        }
    }
}

/// First `parcelle` value of a raw query string (leading `?` allowed).
pub fn parcel_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == PARCEL_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Maps requests onto a pipeline.
pub struct ImageEndpoint<C: HttpClient> {
    pipeline: BordereauPipeline<C>,
}

impl<C: HttpClient> ImageEndpoint<C> {
    pub fn new(pipeline: BordereauPipeline<C>) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &BordereauPipeline<C> {
        &self.pipeline
    }

    pub fn handle_query(&self, query: &str) -> EndpointResponse {
        self.handle(parcel_from_query(query).as_deref())
    }

    /// Runs the pipeline; the persisted file is released once the bytes are
    /// in the response.
    pub fn handle(&self, parcel: Option<&str>) -> EndpointResponse {
        match self.pipeline.run(parcel) {
            Outcome::Image { mut artifact, .. } => EndpointResponse::png(artifact.take_png()),
            Outcome::Empty(_) => EndpointResponse::no_content(),
        }
    }
}
