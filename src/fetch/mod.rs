//! Outbound HTTP: a small client trait, auth wrappers, and request helpers.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde::Serialize;

/// Downloads `url` and returns the body bytes.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// POSTs `body` as JSON and returns the raw response.
///
/// Non-2xx statuses are turned into errors carrying the response text.
pub async fn post_json<C, B>(client: &C, url: &str, body: &B) -> Result<reqwest::Response>
where
    C: HttpClient,
    B: Serialize + ?Sized,
{
    let mut req = reqwest::Request::new(
        reqwest::Method::POST,
        url.parse().with_context(|| format!("invalid URL '{url}'"))?,
    );
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        return Err(anyhow::anyhow!("request failed with status {}: {}", status, text));
    }

    Ok(resp)
}
