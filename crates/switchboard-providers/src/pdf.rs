//! Image-to-PDF conversion.

use serde_json::{json, Value};
use switchboard_core::{
    envelope::{ProviderResult, RawResponse},
    error::SwitchboardError,
    traits::HttpRequest,
};

use crate::{
    client::{build_url, ApiClient, Expect},
    names::IMAGE_TO_PDF,
    normalize::{normalize, unexpected, ResponseParser},
};

/// Expects `{"pdfUrl": "..."}`. Any other 2xx body means the endpoint serves
/// the PDF itself, so the request URL is the download link.
pub struct PdfParser<'a> {
    pub request_url: &'a str,
}

impl ResponseParser for PdfParser<'_> {
    fn action(&self) -> &str {
        "Image to PDF conversion"
    }

    fn parse(&self, raw: RawResponse) -> Result<ProviderResult, SwitchboardError> {
        let pdf_url = match raw.as_json().and_then(|v| v.get("pdfUrl")) {
            Some(Value::String(url)) if !url.is_empty() => url.clone(),
            Some(_) => return Err(unexpected("pdfUrl is not a link")),
            None => self.request_url.to_string(),
        };
        Ok(ProviderResult::ok(
            "Images converted to PDF successfully",
            Some(json!({ "pdfUrl": pdf_url })),
        ))
    }
}

/// Combine the images at `image_urls` into one PDF.
pub async fn images_to_pdf(client: &ApiClient, image_urls: &[String]) -> ProviderResult {
    let joined = image_urls.join(",");
    let api = match client.acquire(IMAGE_TO_PDF) {
        Ok(api) => api,
        Err(e) => return normalize(IMAGE_TO_PDF, Err(e), &PdfParser { request_url: "" }),
    };
    let url = build_url(&api.endpoint, "", &[("url", joined.as_str())]);
    let outcome = client
        .fetch(HttpRequest::get(url.clone(), client.timeout()), Expect::Auto)
        .await;
    normalize(IMAGE_TO_PDF, outcome, &PdfParser { request_url: &url })
}
