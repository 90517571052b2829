//! Raster retrieval from a WMS.

use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, trace};

use super::request::GetMapRequest;
use super::MapError;
use crate::http::{HttpClient, HttpResponse};

/// Fetches and decodes `GetMap` rasters.
pub struct MapTileFetcher<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> MapTileFetcher<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Issues `request` and decodes the answer to RGBA.
    ///
    /// The decoded size is not checked against the requested one.
    pub fn fetch(&self, request: &GetMapRequest) -> Result<RgbaImage, MapError> {
        let url = request.build_url()?;
        debug!(layer = %request.layer, url = %url, "Requesting map");

        let response = self.client.get(&url)?;
        if is_service_exception(&response) {
            return Err(MapError::Service(service_message(&response.body)));
        }

        let raster = image::load_from_memory(&response.body)
            .map_err(|e| MapError::Decode(e.to_string()))?
            .to_rgba8();

        trace!(
            layer = %request.layer,
            width = raster.width(),
            height = raster.height(),
            "Map decoded"
        );
        Ok(raster)
    }
}

fn is_service_exception(response: &HttpResponse) -> bool {
    if response.content_type_contains("xml") {
        return true;
    }
    response
        .body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .map(|b| *b == b'<')
        .unwrap_or(false)
}

/// Text of the first `<ServiceException>` element, or the start of the body.
fn service_message(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let inner = exception_element_start(&text)
        .and_then(|start| {
            let open_end = start + text[start..].find('>')? + 1;
            let close = open_end + text[open_end..].find("</ServiceException>")?;
            Some(text[open_end..close].trim().to_string())
        })
        .filter(|message| !message.is_empty());

    inner.unwrap_or_else(|| text.chars().take(200).collect::<String>().trim().to_string())
}

/// Offset of the first `<ServiceException` tag, skipping `<ServiceExceptionReport`.
fn exception_element_start(text: &str) -> Option<usize> {
    const TAG: &str = "<ServiceException";
    text.match_indices(TAG).map(|(start, _)| start).find(|start| {
        text[start + TAG.len()..]
            .chars()
            .next()
            .map_or(false, |c| c == '>' || c == '/' || c.is_whitespace())
    })
}
