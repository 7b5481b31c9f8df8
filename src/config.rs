use gloo_net::http::Request;
use gloo_net::Error;

use crate::protocol::WidgetConfig;

pub const CONFIG_PATH: &str = "/api/chat/config";

/// Fetch the per-client widget configuration.
///
/// This is the single suspension point before any UI exists: on any
/// failure (transport, non-2xx, malformed body) the caller aborts widget
/// construction. No retries.
pub async fn load_config(backend: &str, client_id: &str) -> Result<WidgetConfig, Error> {
    let url = format!("{backend}{CONFIG_PATH}/{client_id}");
    let response = Request::get(&url).send().await?;
    if !response.ok() {
        return Err(Error::GlooError(format!(
            "configuration endpoint returned HTTP {}",
            response.status()
        )));
    }
    response.json::<WidgetConfig>().await
}
