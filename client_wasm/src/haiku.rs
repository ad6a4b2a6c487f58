//! Flavor-text HTTP call

use game_core::haiku::{self, FlavorError};
use game_core::ResultSummary;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

fn transport(err: JsValue) -> FlavorError {
    FlavorError::Transport(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

async fn generate(api_key: Option<String>, summary: ResultSummary) -> Result<String, FlavorError> {
    let api_key = api_key
        .filter(|k| !k.trim().is_empty())
        .ok_or(FlavorError::MissingKey)?;
    let window = web_sys::window().ok_or_else(|| FlavorError::Transport("no window".to_string()))?;

    let body = haiku::build_request(summary.label(), summary.final_score, summary.achieved).to_json()?;

    let init = RequestInit::new();
    init.set_method("POST");
    init.set_mode(RequestMode::Cors);
    init.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(&haiku::endpoint(), &init).map_err(transport)?;
    let headers = request.headers();
    headers
        .set("Content-Type", "application/json")
        .map_err(transport)?;
    headers.set("x-goog-api-key", &api_key).map_err(transport)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(transport)?;
    if !response.ok() {
        return Err(FlavorError::Status(response.status()));
    }

    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    let text = text.as_string().ok_or(FlavorError::Empty)?;
    haiku::parse_response(&text)
}

/// Haiku for a finished round, or the fixed fallback line. Never fails.
pub async fn compose(api_key: Option<String>, summary: ResultSummary) -> String {
    haiku::resolve(generate(api_key, summary).await)
}
