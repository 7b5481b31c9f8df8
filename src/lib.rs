use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

pub mod channel;
pub mod config;
pub mod dom;
pub mod protocol;
pub mod render;
pub mod session;
pub mod ui;
pub mod utils;

pub use protocol::*;

/// Initialize the WASM module
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("chat-widget WASM initialized");
}

/// Entry point called by the loader script once the module is ready.
///
/// Construction failures never escape to the host page: missing client
/// id and unavailable configuration are logged to the console and leave
/// the document untouched.
#[wasm_bindgen]
pub async fn init_widget() -> Result<(), JsValue> {
    let document = document()?;

    if boot_must_wait(&document.ready_state()) {
        let closure = Closure::wrap(Box::new(move || {
            wasm_bindgen_futures::spawn_local(async {
                if let Err(e) = boot().await {
                    log::error!("chat-widget: failed to start: {:?}", e);
                }
            });
        }) as Box<dyn FnMut()>);
        document
            .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())?;
        closure.forget();
        return Ok(());
    }

    if let Err(e) = boot().await {
        log::error!("chat-widget: failed to start: {:?}", e);
    }
    Ok(())
}

async fn boot() -> Result<(), JsValue> {
    let document = document()?;

    let Some(params) = utils::find_embed_params(&document) else {
        log::error!("chat-widget: clientId query parameter is required");
        return Ok(());
    };

    let config = match config::load_config(&params.backend, &params.client_id).await {
        Ok(config) => config,
        Err(e) => {
            log::error!("chat-widget: could not load widget configuration: {}", e);
            return Ok(());
        }
    };

    let app = ui::WidgetApp::mount(document, params, config)?;
    app.wire_events()?;
    app.schedule_timers();

    Ok(())
}

/// `document.readyState` is a plain string on the wire; the widget only
/// cares whether the DOM is still parsing.
fn boot_must_wait(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Get the window object
fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

/// Get the document object
fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_defers_only_while_the_dom_is_parsing() {
        assert!(boot_must_wait("loading"));
        assert!(!boot_must_wait("interactive"));
        assert!(!boot_must_wait("complete"));
    }
}
