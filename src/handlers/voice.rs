use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::Form;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::errors::AppError;
use crate::models::{StepDescriptor, TurnInput};
use crate::services::{call, twiml};
use crate::state::AppState;

type FormParams = Vec<(String, String)>;

/// GET|POST /incoming-call
pub async fn incoming_call(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    form: Option<Form<FormParams>>,
) -> Result<Response, AppError> {
    let params = form_params(form);
    // GET callbacks carry their fields in the signed URL itself.
    let signed: &[(String, String)] = if method == Method::GET { &[] } else { &params };
    verify_request(&state, &headers, &uri, signed)?;

    let turn = TurnInput::from_params(&params);
    let step = call::open_call(&state, &turn);
    Ok(twiml_response(&step))
}

/// POST /handle-input, /schedule-name, /schedule-time, /schedule-confirm
pub async fn submit_turn(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    OriginalUri(uri): OriginalUri,
    form: Option<Form<FormParams>>,
) -> Result<Response, AppError> {
    let params = form_params(form);
    verify_request(&state, &headers, &uri, &params)?;

    let turn = TurnInput::from_params(&params);
    tracing::info!(
        call_sid = %turn.call_sid,
        endpoint = uri.path(),
        digits = %turn.digits,
        speech = %turn.speech,
        "voice turn"
    );

    let step = call::process_turn(&state, uri.path(), &turn).await;
    Ok(twiml_response(&step))
}

// A body that is not a form still gets a spoken reply, treated as a silent turn.
fn form_params(form: Option<Form<FormParams>>) -> FormParams {
    match form {
        Some(Form(params)) => params,
        None => {
            tracing::warn!("webhook body is not form-encoded, treating as empty turn");
            Vec::new()
        }
    }
}

fn twiml_response(step: &StepDescriptor) -> Response {
    (
        [(header::CONTENT_TYPE, twiml::CONTENT_TYPE)],
        twiml::render(step),
    )
        .into_response()
}

// Skipped when no auth token is configured (dev mode).
fn verify_request(
    state: &AppState,
    headers: &HeaderMap,
    uri: &Uri,
    params: &[(String, String)],
) -> Result<(), AppError> {
    let auth_token = &state.config.twilio_auth_token;
    if auth_token.is_empty() {
        return Ok(());
    }

    let signature = headers
        .get("x-twilio-signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if signature.is_empty() {
        tracing::warn!(path = uri.path(), "missing X-Twilio-Signature header");
        return Err(AppError::Forbidden("missing signature".to_string()));
    }

    let url = public_url(headers, uri);
    if !validate_twilio_signature(auth_token, signature, &url, params) {
        tracing::warn!(url = %url, "invalid Twilio signature");
        return Err(AppError::Forbidden("invalid signature".to_string()));
    }

    Ok(())
}

/// The URL the provider called, rebuilt from proxy headers when present.
fn public_url(headers: &HeaderMap, uri: &Uri) -> String {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let proto = header("x-forwarded-proto").unwrap_or("https");
    let host = header("x-forwarded-host")
        .or_else(|| header("host"))
        .unwrap_or("localhost");
    let path = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("{proto}://{host}{path}")
}

/// base64(HMAC-SHA1(token, url + sorted key/value pairs)).
pub fn compute_twilio_signature(
    auth_token: &str,
    url: &str,
    params: &[(String, String)],
) -> Option<String> {
    let mac = signing_mac(auth_token, url, params)?;
    Some(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

fn validate_twilio_signature(
    auth_token: &str,
    signature: &str,
    url: &str,
    params: &[(String, String)],
) -> bool {
    let Ok(expected) = base64::engine::general_purpose::STANDARD.decode(signature) else {
        return false;
    };
    match signing_mac(auth_token, url, params) {
        Some(mac) => mac.verify_slice(&expected).is_ok(),
        None => false,
    }
}

fn signing_mac(auth_token: &str, url: &str, params: &[(String, String)]) -> Option<Hmac<Sha1>> {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut mac = Hmac::<Sha1>::new_from_slice(auth_token.as_bytes()).ok()?;
    mac.update(url.as_bytes());
    for (key, value) in sorted {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    Some(mac)
}
