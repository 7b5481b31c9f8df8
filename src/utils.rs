use wasm_bindgen::JsCast;
use web_sys::Document;

/// Parameters carried by the embedding `<script>` tag.
///
/// The widget is loaded as
/// `<script src="https://backend.example.com/widget.js?clientId=XXXX">`,
/// so the script URL provides both the client identifier and the backend
/// origin that serves the config and chat endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedParams {
    pub client_id: String,
    pub backend: String,
}

/// Scan the document for the widget script tag and extract its parameters.
pub fn find_embed_params(document: &Document) -> Option<EmbedParams> {
    let scripts = document.get_elements_by_tag_name("script");
    for i in 0..scripts.length() {
        let Some(element) = scripts.item(i) else {
            continue;
        };
        let Ok(script) = element.dyn_into::<web_sys::HtmlScriptElement>() else {
            continue;
        };
        if let Some(params) = parse_embed_src(&script.src()) {
            return Some(params);
        }
    }
    None
}

/// Parse a script `src` URL of the form
/// `https://host[:port]/…widget…?clientId=XXXX[&…]`.
///
/// Returns `None` for non-widget scripts, a missing `clientId` parameter,
/// or an empty client identifier.
pub fn parse_embed_src(src: &str) -> Option<EmbedParams> {
    let (base, query) = src.split_once('?')?;
    if !base.contains("widget") {
        return None;
    }
    let client_id = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("clientId="))?;
    if client_id.is_empty() {
        return None;
    }
    let backend = origin_of(base)?;
    Some(EmbedParams {
        client_id: client_id.to_string(),
        backend,
    })
}

/// Extract `scheme://host[:port]` from an absolute URL.
fn origin_of(url: &str) -> Option<String> {
    let scheme_end = url.find("://")?;
    let host_start = scheme_end + 3;
    let rest = &url[host_start..];
    let host_end = rest
        .find('/')
        .map(|i| host_start + i)
        .unwrap_or(url.len());
    if host_end == host_start {
        return None;
    }
    Some(url[..host_end].to_string())
}

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render message text as safe inline markup: escaped, with newlines as
/// line breaks.
pub fn render_text(s: &str) -> String {
    escape_html(s).replace('\n', "<br>")
}
