//! Shared HTTP request helpers for CLI commands.

use anyhow::{Context, Result, bail};
use reqwest::multipart;
use serde::Deserialize;

use runwire_core::WireTuple;

pub fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// GET a JSON document, authenticating with `user` as the basic-auth user.
pub async fn get_json<T: for<'de> Deserialize<'de>>(
    client: &reqwest::Client,
    url: &str,
    user: &str,
) -> Result<T> {
    let resp = client
        .get(url)
        .basic_auth(user, None::<&str>)
        .send()
        .await
        .with_context(|| format!("failed to connect to {url}"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("request to {url} failed ({status}): {body}");
    }

    resp.json::<T>().await.context("failed to parse response")
}

/// Build the multipart form for a wire tuple: a JSON `data` part and, when
/// present, a `file` part named after its field and type tag.
pub fn wire_form(tuple: &WireTuple) -> Result<multipart::Form> {
    let data_part = multipart::Part::text(tuple.data.clone()).mime_str("application/json")?;
    let mut form = multipart::Form::new().part("data", data_part);

    if let Some(file) = &tuple.file {
        let file_part = multipart::Part::bytes(file.payload.as_bytes().to_vec())
            .file_name(file.file_name())
            .mime_str(file.type_tag.mime())?;
        form = form.part("file", file_part);
    }
    Ok(form)
}

/// POST a wire tuple and return the raw response body.
pub async fn post_wire_tuple(
    client: &reqwest::Client,
    url: &str,
    user: &str,
    tuple: &WireTuple,
) -> Result<String> {
    let resp = client
        .post(url)
        .basic_auth(user, None::<&str>)
        .multipart(wire_form(tuple)?)
        .send()
        .await
        .with_context(|| format!("failed to connect to {url}"))?;

    let status = resp.status();
    let body = resp.text().await.context("failed to read response body")?;
    if !status.is_success() {
        bail!("run failed ({status}): {body}");
    }
    Ok(body)
}
