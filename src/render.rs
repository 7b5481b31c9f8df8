use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, ShadowRoot, ShadowRootInit, ShadowRootMode};

use crate::dom;
use crate::protocol::{Position, WidgetConfig};
use crate::utils;

pub const HOST_ID: &str = "cw-host";
pub const LAUNCHER_ID: &str = "cw-launcher";
pub const PANEL_ID: &str = "cw-panel";
pub const MESSAGES_ID: &str = "cw-messages";
pub const INPUT_ID: &str = "cw-input";
pub const SEND_ID: &str = "cw-send";
pub const CLOSE_ID: &str = "cw-close";
pub const BADGE_ID: &str = "cw-badge";

/// Handles to the interactive elements inside the shadow root.
pub struct WidgetHandles {
    pub host: HtmlElement,
    pub shadow: ShadowRoot,
    pub launcher: HtmlElement,
    pub panel: HtmlElement,
    pub messages: Element,
    pub input: HtmlInputElement,
    pub send: Element,
    pub close: Element,
    pub badge: HtmlElement,
}

/// Build the widget subtree and attach it to the document body.
///
/// The subtree lives behind a shadow root, so host-page CSS cannot reach
/// the widget's internals and the widget's stylesheet cannot leak out.
/// Calling this twice appends a second subtree; the caller owns that
/// guarantee.
pub fn mount_widget(document: &Document, config: &WidgetConfig) -> Result<WidgetHandles, JsValue> {
    let host = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()?;
    host.set_id(HOST_ID);
    host.style().set_css_text(&host_css(config.position));

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;
    body.append_child(&host)?;

    let shadow = host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?;
    shadow.set_inner_html(&widget_markup(config));

    Ok(WidgetHandles {
        launcher: dom::shadow_html_element(&shadow, LAUNCHER_ID)?,
        panel: dom::shadow_html_element(&shadow, PANEL_ID)?,
        messages: dom::shadow_element(&shadow, MESSAGES_ID)?,
        input: dom::shadow_input(&shadow, INPUT_ID)?,
        send: dom::shadow_element(&shadow, SEND_ID)?,
        close: dom::shadow_element(&shadow, CLOSE_ID)?,
        badge: dom::shadow_html_element(&shadow, BADGE_ID)?,
        host,
        shadow,
    })
}

/// Inline style for the fixed-position host element. This is the only
/// style that lives outside the shadow boundary.
pub fn host_css(position: Position) -> String {
    let corner = match position {
        Position::BottomLeft => "bottom:20px;left:20px;",
        Position::BottomRight => "bottom:20px;right:20px;",
    };
    format!("position:fixed;z-index:2147483647;{corner}")
}

/// The widget stylesheet. The accent color is referenced exclusively
/// through the `--cw-accent` custom property declared in [`style_block`].
const STYLE: &str = r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
:host { font-family: 'Segoe UI', Arial, sans-serif; }

#cw-launcher {
  width: 60px; height: 60px; border-radius: 50%;
  background: var(--cw-accent); border: none; cursor: pointer;
  box-shadow: 0 4px 20px rgba(0,0,0,.25);
  display: flex; align-items: center; justify-content: center;
  font-size: 26px; transition: transform .2s, box-shadow .2s;
  position: relative;
}
#cw-launcher:hover { transform: scale(1.08); box-shadow: 0 6px 28px rgba(0,0,0,.3); }
#cw-badge {
  position: absolute; top: -4px; right: -4px;
  width: 18px; height: 18px; border-radius: 50%;
  background: #00b86b; border: 2px solid white;
  display: none; animation: cw-pulse 2s infinite;
}
@keyframes cw-pulse { 0%,100%{transform:scale(1)}50%{transform:scale(1.15)} }

#cw-panel {
  width: 360px; height: 520px;
  background: white; border-radius: 20px;
  box-shadow: 0 20px 60px rgba(0,0,0,.2);
  display: flex; flex-direction: column;
  margin-bottom: 12px; overflow: hidden;
  transform-origin: bottom right;
  animation: cw-slide-up .25s ease;
}
@keyframes cw-slide-up { from{opacity:0;transform:translateY(20px) scale(.95)} to{opacity:1;transform:translateY(0) scale(1)} }

#cw-header {
  background: var(--cw-accent); padding: 16px 18px;
  display: flex; align-items: center; gap: 12px;
  flex-shrink: 0;
}
.cw-avatar { width: 40px; height: 40px; border-radius: 50%; background: rgba(255,255,255,.2); display: flex; align-items: center; justify-content: center; font-size: 20px; flex-shrink: 0; }
.cw-header-info { flex: 1; }
.cw-bot-name { color: white; font-weight: 700; font-size: .95rem; }
.cw-status { color: rgba(255,255,255,.7); font-size: .75rem; display: flex; align-items: center; gap: 5px; }
.cw-dot { width: 7px; height: 7px; border-radius: 50%; background: #00e676; }
#cw-close { color: rgba(255,255,255,.8); cursor: pointer; font-size: 1.3rem; line-height: 1; padding: 4px; background: none; border: none; }
#cw-close:hover { color: white; }

#cw-messages {
  flex: 1; overflow-y: auto; padding: 16px;
  display: flex; flex-direction: column; gap: 10px;
  background: #f8f8f8;
}
#cw-messages::-webkit-scrollbar { width: 4px; }
#cw-messages::-webkit-scrollbar-track { background: transparent; }
#cw-messages::-webkit-scrollbar-thumb { background: #ddd; border-radius: 2px; }

.cw-msg { display: flex; gap: 8px; max-width: 85%; }
.cw-msg.user { align-self: flex-end; flex-direction: row-reverse; }
.cw-msg.bot  { align-self: flex-start; }
.cw-bubble {
  padding: 10px 14px; border-radius: 18px;
  font-size: .875rem; line-height: 1.5; word-break: break-word;
}
.cw-msg.bot  .cw-bubble { background: white; color: #111; border-bottom-left-radius: 4px; box-shadow: 0 1px 4px rgba(0,0,0,.08); }
.cw-msg.user .cw-bubble { background: var(--cw-accent); color: white; border-bottom-right-radius: 4px; }

.cw-typing { display: flex; gap: 4px; padding: 12px 16px; }
.cw-typing span { width: 8px; height: 8px; border-radius: 50%; background: #aaa; animation: cw-bounce .9s infinite; }
.cw-typing span:nth-child(2) { animation-delay: .15s; }
.cw-typing span:nth-child(3) { animation-delay: .3s; }
@keyframes cw-bounce { 0%,60%,100%{transform:translateY(0)}30%{transform:translateY(-6px)} }

#cw-footer { padding: 10px 12px; background: white; border-top: 1px solid #eee; flex-shrink: 0; }
#cw-form { display: flex; gap: 8px; align-items: center; }
#cw-input {
  flex: 1; padding: 10px 14px; border: 1px solid #e0e0e0;
  border-radius: 24px; font-size: .875rem; outline: none;
  transition: border-color .2s; font-family: inherit;
}
#cw-input:focus { border-color: var(--cw-accent); }
#cw-send {
  width: 40px; height: 40px; border-radius: 50%;
  background: var(--cw-accent); border: none; cursor: pointer;
  display: flex; align-items: center; justify-content: center;
  flex-shrink: 0; transition: opacity .2s;
}
#cw-send:hover { opacity: .88; }
#cw-send svg { width: 18px; height: 18px; fill: white; }
.cw-powered { text-align: center; font-size: .65rem; color: #bbb; padding: 4px 0 0; }

@media (max-width: 400px) {
  #cw-panel { width: 100vw; height: 100vh; border-radius: 0; margin: 0; }
}
"#;

/// Stylesheet with the accent color substituted exactly once, as a CSS
/// custom property every accent-colored rule reads.
pub fn style_block(accent: &str) -> String {
    format!(":host {{ --cw-accent: {accent}; }}{STYLE}")
}

/// Full shadow-root markup, parameterized by the widget configuration.
/// Config-derived text is HTML-escaped on the way in.
pub fn widget_markup(config: &WidgetConfig) -> String {
    format!(
        r#"<style>{style}</style>
<div id="cw-container" style="display:flex;flex-direction:column;align-items:flex-end;">
  <div id="{panel}" style="display:none;">
    <div id="cw-header">
      <div class="cw-avatar">{header_avatar}</div>
      <div class="cw-header-info">
        <div class="cw-bot-name">{bot_name}</div>
        <div class="cw-status"><span class="cw-dot"></span>Online now</div>
      </div>
      <button id="{close}">✕</button>
    </div>
    <div id="{messages}"></div>
    <div id="cw-footer">
      <div id="cw-form">
        <input id="{input}" type="text" placeholder="Type your message..." maxlength="500" autocomplete="off" />
        <button id="{send}">
          <svg viewBox="0 0 24 24"><path d="M2 21L23 12 2 3v7l15 2-15 2z"/></svg>
        </button>
      </div>
      <div class="cw-powered">Chat assistant</div>
    </div>
  </div>
  <button id="{launcher}">
    <span id="cw-launcher-icon">{launcher_avatar}</span>
    <span id="{badge}"></span>
  </button>
</div>"#,
        style = style_block(config.accent()),
        panel = PANEL_ID,
        close = CLOSE_ID,
        messages = MESSAGES_ID,
        input = INPUT_ID,
        send = SEND_ID,
        launcher = LAUNCHER_ID,
        badge = BADGE_ID,
        header_avatar = utils::escape_html(config.header_avatar()),
        bot_name = utils::escape_html(&config.bot_name),
        launcher_avatar = utils::escape_html(config.launcher_avatar()),
    )
}
