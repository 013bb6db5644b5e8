use std::cell::RefCell;
use std::rc::Rc;

use orrery_engine::{AssetError, AssetId, AssetPayload, AssetRequest};

/// A fetch result waiting to be settled on the next tick.
pub type Fetched = (AssetId, Result<AssetPayload, AssetError>);

/// Turns asset requests into payloads, asynchronously.
///
/// Results are queued and collected by `poll` at the start of a tick, so the
/// scene is only ever mutated inside the runner.
pub trait AssetFetcher {
    fn dispatch(&mut self, requests: Vec<AssetRequest>);
    fn poll(&mut self) -> Vec<Fetched>;
}

/// Fetches over `window.fetch`, one `spawn_local` future per request.
#[derive(Default)]
pub struct BrowserFetcher {
    completed: Rc<RefCell<Vec<Fetched>>>,
}

impl BrowserFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetFetcher for BrowserFetcher {
    #[cfg(target_arch = "wasm32")]
    fn dispatch(&mut self, requests: Vec<AssetRequest>) {
        for request in requests {
            let completed = Rc::clone(&self.completed);
            wasm_bindgen_futures::spawn_local(async move {
                let result = fetch_asset(&request).await;
                completed.borrow_mut().push((request.id, result));
            });
        }
    }

    /// Outside the browser there is nothing to fetch with.
    #[cfg(not(target_arch = "wasm32"))]
    fn dispatch(&mut self, requests: Vec<AssetRequest>) {
        let mut completed = self.completed.borrow_mut();
        for request in requests {
            completed.push((request.id, Err(AssetError::Unsupported { url: request.url })));
        }
    }

    fn poll(&mut self) -> Vec<Fetched> {
        std::mem::take(&mut *self.completed.borrow_mut())
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_asset(request: &AssetRequest) -> Result<AssetPayload, AssetError> {
    use orrery_engine::{AssetKind, DecodedTexture, ModelDescriptor};

    let bytes = fetch_bytes(&request.url).await?;
    match request.kind {
        AssetKind::Texture => DecodedTexture::from_bytes(&bytes)
            .map(AssetPayload::Texture)
            .map_err(|source| AssetError::Decode {
                url: request.url.clone(),
                source,
            }),
        AssetKind::Model => {
            let text = String::from_utf8_lossy(&bytes);
            ModelDescriptor::from_json(&request.url, &text).map(AssetPayload::Model)
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast as _;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let fetch_err = |message: String| AssetError::Fetch {
        url: url.to_string(),
        message,
    };

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| fetch_err(format!("bad request: {:?}", e)))?;

    let window = web_sys::window().ok_or_else(|| fetch_err("no window".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| fetch_err(format!("{:?}", e)))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| fetch_err("response is not a Response".into()))?;

    if !resp.ok() {
        return Err(AssetError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }

    let array_buffer = JsFuture::from(
        resp.array_buffer()
            .map_err(|e| fetch_err(format!("no body: {:?}", e)))?,
    )
    .await
    .map_err(|e| fetch_err(format!("body read failed: {:?}", e)))?;

    Ok(js_sys::Uint8Array::new(&array_buffer).to_vec())
}
