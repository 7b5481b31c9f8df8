use std::rc::Rc;

use gloo_net::http::Request;
use wasm_bindgen::JsValue;

use crate::dom;
use crate::protocol::{ChatRequest, ChatResponse, Role};
use crate::ui::WidgetApp;

pub const CHAT_PATH: &str = "/api/chat";

/// Shown when the backend reports a handled failure for a message.
pub const APP_ERROR_REPLY: &str = "😕 Sorry, something went wrong. Please try again.";
/// Shown when the chat round trip itself fails to complete.
pub const OFFLINE_REPLY: &str = "😕 I can't connect right now. Please try again in a moment.";

/// Send the current input to the backend and render the outcome.
///
/// Empty input (after trimming) and sends issued while a prior send is
/// still outstanding are silent no-ops: no request leaves the widget.
/// No retries in any failure branch; the user resends manually.
pub async fn send_message(app: Rc<WidgetApp>) -> Result<(), JsValue> {
    let raw = app.ui.input.value();
    let text = raw.trim();
    if text.is_empty() || app.state.borrow().is_typing {
        return Ok(());
    }
    let text = text.to_string();

    app.ui.input.set_value("");
    app.append_message(Role::User, &text)?;
    app.set_typing(true)?;
    dom::scroll_to_bottom(&app.ui.messages);

    let session_id = app.state.borrow().session_id.clone();
    let request = ChatRequest {
        client_id: &app.client_id,
        message: &text,
        session_id: session_id.as_deref(),
    };
    let outcome = post_chat(&app.backend, &request).await;

    if !app.ui.messages.is_connected() {
        // The embedding page removed the widget while the request was in
        // flight; abandon the pending UI updates.
        return Ok(());
    }

    app.set_typing(false)?;
    match outcome {
        Ok(reply) => {
            if let Some(session_id) = reply.session_id.clone() {
                app.session.save(&session_id);
                app.state.borrow_mut().session_id = Some(session_id);
            }
            if let Some(response) = &reply.response {
                app.append_message(Role::Bot, response)?;
            }
            if reply.is_application_error() {
                log::warn!("chat-widget: backend reported an error for the last message");
                app.append_message(Role::Bot, APP_ERROR_REPLY)?;
            }
        }
        Err(e) => {
            log::error!("chat-widget: chat request failed: {}", e);
            app.append_message(Role::Bot, OFFLINE_REPLY)?;
        }
    }
    dom::scroll_to_bottom(&app.ui.messages);

    Ok(())
}

async fn post_chat(
    backend: &str,
    request: &ChatRequest<'_>,
) -> Result<ChatResponse, gloo_net::Error> {
    let url = format!("{backend}{CHAT_PATH}");
    Request::post(&url)
        .json(request)?
        .send()
        .await?
        .json::<ChatResponse>()
        .await
}
