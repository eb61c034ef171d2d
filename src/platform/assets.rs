//! Asset loading (map and atlas JSON, tileset and atlas images)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("no browser window")]
    NoWindow,
    #[error("request for '{url}' failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("'{url}' returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("'{0}' did not return text")]
    NotText(String),
    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(target_arch = "wasm32")]
fn js_error(url: &str) -> impl Fn(wasm_bindgen::JsValue) -> AssetError + '_ {
    move |e| AssetError::Fetch {
        url: url.to_string(),
        reason: format!("{:?}", e),
    }
}

/// GET `url` and fail on non-2xx statuses (WASM only)
#[cfg(target_arch = "wasm32")]
async fn fetch_ok(url: &str) -> Result<web_sys::Response, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or(AssetError::NoWindow)?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_error(url))?;
    let response: web_sys::Response = response.dyn_into().map_err(js_error(url))?;
    if !response.ok() {
        return Err(AssetError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    Ok(response)
}

/// Fetch a text asset relative to the page (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_text(url: &str) -> Result<String, AssetError> {
    use wasm_bindgen_futures::JsFuture;

    let response = fetch_ok(url).await?;
    let text = JsFuture::from(response.text().map_err(js_error(url))?)
        .await
        .map_err(js_error(url))?;
    let text = text
        .as_string()
        .ok_or_else(|| AssetError::NotText(url.to_string()))?;
    log::info!("Fetched {} ({} bytes)", url, text.len());
    Ok(text)
}

/// Fetch a binary asset (images) relative to the page (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen_futures::JsFuture;

    let response = fetch_ok(url).await?;
    let buffer = JsFuture::from(response.array_buffer().map_err(js_error(url))?)
        .await
        .map_err(js_error(url))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    log::info!("Fetched {} ({} bytes)", url, bytes.len());
    Ok(bytes)
}

/// Read a text asset from disk (native only)
#[cfg(not(target_arch = "wasm32"))]
pub fn read_text(path: &str) -> Result<String, AssetError> {
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_string(),
        source,
    })?;
    log::info!("Read {} ({} bytes)", path, text.len());
    Ok(text)
}
