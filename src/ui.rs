use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element};

use crate::channel;
use crate::dom;
use crate::protocol::{Role, SessionId, WidgetConfig};
use crate::render::{self, WidgetHandles};
use crate::session::SessionStore;
use crate::utils::EmbedParams;

/// The attention badge appears this long after render if the panel has
/// not been opened yet.
pub const ATTENTION_BADGE_DELAY_MS: u32 = 5_000;
/// Delay before the scheduled auto-open when the config requests it.
pub const AUTO_OPEN_DELAY_MS: u32 = 1_000;

/// One widget instance: configuration, DOM handles, and mutable UI state.
///
/// All state lives in this single owned object; closures capture an
/// `Rc` to it rather than individual globals, so a page could host more
/// than one independent instance.
pub struct WidgetApp {
    pub client_id: String,
    pub backend: String,
    pub config: WidgetConfig,
    pub document: Document,
    pub ui: WidgetHandles,
    pub session: SessionStore,
    pub state: RefCell<UiState>,
}

#[derive(Default)]
pub struct UiState {
    pub is_open: bool,
    pub is_typing: bool,
    pub session_id: Option<SessionId>,
    typing_bubble: Option<Element>,
    badge_timer: Option<Timeout>,
    auto_open_timer: Option<Timeout>,
}

impl WidgetApp {
    /// Render the widget subtree and assemble the instance. The session
    /// identifier, if one was persisted earlier, is loaded here.
    pub fn mount(
        document: Document,
        params: EmbedParams,
        config: WidgetConfig,
    ) -> Result<Rc<Self>, JsValue> {
        let ui = render::mount_widget(&document, &config)?;
        let session = SessionStore::new(&params.client_id);
        let state = UiState {
            session_id: session.load(),
            ..UiState::default()
        };

        Ok(Rc::new(Self {
            client_id: params.client_id,
            backend: params.backend,
            config,
            document,
            ui,
            session,
            state: RefCell::new(state),
        }))
    }

    /// Wire the launcher, close, send, and Enter-key interactions.
    pub fn wire_events(self: &Rc<Self>) -> Result<(), JsValue> {
        let app = self.clone();
        dom::add_click_listener(&self.ui.launcher, move || {
            if let Err(e) = app.open() {
                log::error!("chat-widget: failed to open panel: {:?}", e);
            }
        })?;

        let app = self.clone();
        dom::add_click_listener(&self.ui.close, move || {
            app.close();
        })?;

        let app = self.clone();
        dom::add_click_listener(&self.ui.send, move || {
            spawn_send(app.clone());
        })?;

        let app = self.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                spawn_send(app.clone());
            }
        }) as Box<dyn FnMut(_)>);
        self.ui
            .input
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    /// Arm the two one-shot timers. Both are cancelled by a manual open,
    /// so opening the panel early never races them.
    pub fn schedule_timers(self: &Rc<Self>) {
        let badge = self.ui.badge.clone();
        let badge_timer = Timeout::new(ATTENTION_BADGE_DELAY_MS, move || {
            dom::show_block(&badge);
        });

        let auto_open_timer = self.config.initial_open.then(|| {
            let app = self.clone();
            Timeout::new(AUTO_OPEN_DELAY_MS, move || {
                // Release our own handle before open() tries to cancel it;
                // dropping the closure mid-call is not allowed.
                let pending = app.state.borrow_mut().auto_open_timer.take();
                if let Some(timer) = pending {
                    timer.forget();
                }
                if let Err(e) = app.open() {
                    log::error!("chat-widget: scheduled open failed: {:?}", e);
                }
            })
        });

        let mut state = self.state.borrow_mut();
        state.badge_timer = Some(badge_timer);
        state.auto_open_timer = auto_open_timer;
    }

    /// Closed -> Open: show the panel, hide launcher and badge, cancel
    /// pending timers, focus the input, and synthesize the greeting if
    /// the message list is still empty.
    pub fn open(self: &Rc<Self>) -> Result<(), JsValue> {
        {
            let mut state = self.state.borrow_mut();
            state.is_open = true;
            if let Some(timer) = state.badge_timer.take() {
                timer.cancel();
            }
            if let Some(timer) = state.auto_open_timer.take() {
                timer.cancel();
            }
        }

        dom::show_flex(&self.ui.panel);
        dom::hide(&self.ui.launcher);
        dom::hide(&self.ui.badge);
        let _ = self.ui.input.focus();

        if self.ui.messages.child_element_count() == 0 {
            let greeting = self.config.greeting_text().to_string();
            self.append_message(Role::Bot, &greeting)?;
        }
        dom::scroll_to_bottom(&self.ui.messages);

        Ok(())
    }

    /// Open -> Closed: hide the panel, bring the launcher back. Message
    /// history stays in the DOM for the rest of the page session.
    pub fn close(&self) {
        self.state.borrow_mut().is_open = false;
        dom::hide(&self.ui.panel);
        dom::show_flex(&self.ui.launcher);
    }

    /// Append a message bubble. The text is escaped before insertion.
    pub fn append_message(&self, role: Role, text: &str) -> Result<(), JsValue> {
        let message = dom::create_element_with_class(
            &self.document,
            "div",
            &format!("cw-msg {}", role.css_class()),
        )?;
        message.set_inner_html(&format!(
            r#"<div class="cw-bubble">{}</div>"#,
            crate::utils::render_text(text)
        ));
        self.ui.messages.append_child(&message)?;
        Ok(())
    }

    /// Enter or leave the typing sub-state. The placeholder element is
    /// tracked in `UiState`, so there is at most one at a time.
    pub fn set_typing(&self, typing: bool) -> Result<(), JsValue> {
        let mut state = self.state.borrow_mut();
        state.is_typing = typing;
        if typing {
            if state.typing_bubble.is_none() {
                let bubble = dom::create_element_with_class(&self.document, "div", "cw-msg bot")?;
                bubble.set_inner_html(
                    r#"<div class="cw-bubble"><div class="cw-typing"><span></span><span></span><span></span></div></div>"#,
                );
                self.ui.messages.append_child(&bubble)?;
                state.typing_bubble = Some(bubble);
            }
        } else if let Some(bubble) = state.typing_bubble.take() {
            bubble.remove();
        }
        Ok(())
    }
}

fn spawn_send(app: Rc<WidgetApp>) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = channel::send_message(app).await {
            log::error!("chat-widget: failed to send message: {:?}", e);
        }
    });
}
