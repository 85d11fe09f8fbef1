use crate::constants::{API_KEY_META, NARRATION_ENDPOINT, NARRATION_MODEL};
use crate::dom;
use guardian_core::{fallback_text, or_fallback, prompt_for, NarrationError, NarrationFuture, Narrator, Stage};
use js_sys::{Array, Object, Reflect, JSON};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn transport(e: JsValue) -> NarrationError {
    NarrationError::Transport(format!("{:?}", e))
}

fn malformed(e: JsValue) -> NarrationError {
    NarrationError::Malformed(format!("{:?}", e))
}

/// Narrator backed by the Gemini `generateContent` endpoint.
///
/// Without an API key every request resolves to the fixed text at once.
pub struct RemoteNarrator {
    api_key: Option<String>,
    model: String,
}

impl RemoteNarrator {
    /// Key from the page's `<meta name="guardian-api-key">`, else the
    /// build-time `GUARDIAN_API_KEY`.
    pub fn from_page(document: &web::Document) -> Self {
        let api_key = dom::meta_content(document, API_KEY_META)
            .or_else(|| option_env!("GUARDIAN_API_KEY").map(str::to_string))
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            log::info!("[narration] no API key; using fixed text");
        }
        Self {
            api_key,
            model: NARRATION_MODEL.to_string(),
        }
    }

    async fn generate(&self, stage: Stage) -> Result<String, NarrationError> {
        let key = self.api_key.as_deref().ok_or(NarrationError::Unconfigured)?;
        let Some(prompt) = prompt_for(stage) else {
            return Ok(fallback_text(stage).to_string());
        };
        let url = format!(
            "{}/{}:generateContent?key={}",
            NARRATION_ENDPOINT, self.model, key
        );

        let opts = web::RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(web::RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&request_body(&prompt)?));
        let request = web::Request::new_with_str_and_init(&url, &opts).map_err(transport)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(transport)?;

        let window = web::window().ok_or_else(|| NarrationError::Transport("no window".into()))?;
        let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?
            .dyn_into()
            .map_err(malformed)?;
        if !response.ok() {
            return Err(NarrationError::Status(response.status()));
        }
        let body = JsFuture::from(response.json().map_err(malformed)?)
            .await
            .map_err(malformed)?;
        extract_text(&body)
    }
}

impl Narrator for RemoteNarrator {
    fn narrate(&self, stage: Stage) -> NarrationFuture<'_> {
        Box::pin(async move { or_fallback(stage, self.generate(stage).await) })
    }
}

/// `{"contents":[{"parts":[{"text": prompt}]}]}`
fn request_body(prompt: &str) -> Result<String, NarrationError> {
    let part = Object::new();
    Reflect::set(&part, &"text".into(), &prompt.into()).map_err(malformed)?;
    let content = Object::new();
    Reflect::set(&content, &"parts".into(), &Array::of1(&part)).map_err(malformed)?;
    let body = Object::new();
    Reflect::set(&body, &"contents".into(), &Array::of1(&content)).map_err(malformed)?;
    JSON::stringify(&body).map(String::from).map_err(malformed)
}

/// Concatenated text parts of the first candidate.
fn extract_text(body: &JsValue) -> Result<String, NarrationError> {
    let get = |v: &JsValue, key: &str| Reflect::get(v, &key.into()).map_err(malformed);
    let candidates: Array = get(body, "candidates")?
        .dyn_into()
        .map_err(|_| NarrationError::Malformed("no candidates".into()))?;
    let first = candidates.get(0);
    if first.is_undefined() {
        return Err(NarrationError::Empty);
    }
    let parts: Array = get(&get(&first, "content")?, "parts")?
        .dyn_into()
        .map_err(|_| NarrationError::Malformed("no parts".into()))?;
    let text: String = parts
        .iter()
        .filter_map(|p| Reflect::get(&p, &"text".into()).ok())
        .filter_map(|t| t.as_string())
        .collect();
    if text.trim().is_empty() {
        return Err(NarrationError::Empty);
    }
    Ok(text)
}
