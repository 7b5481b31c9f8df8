use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, ShadowRoot};

/// Get element by ID inside the widget's shadow root
pub fn shadow_element(shadow: &ShadowRoot, id: &str) -> Result<Element, JsValue> {
    shadow
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", id)))
}

/// Get HTML element by ID inside the widget's shadow root
pub fn shadow_html_element(shadow: &ShadowRoot, id: &str) -> Result<HtmlElement, JsValue> {
    let element = shadow_element(shadow, id)?;
    element
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("Element is not HtmlElement: {}", id)))
}

/// Get input element by ID inside the widget's shadow root
pub fn shadow_input(shadow: &ShadowRoot, id: &str) -> Result<HtmlInputElement, JsValue> {
    let element = shadow_element(shadow, id)?;
    element
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("Element is not HtmlInputElement: {}", id)))
}

/// Create element with class
pub fn create_element_with_class(
    document: &Document,
    tag: &str,
    class: &str,
) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

/// Add event listener to element
pub fn add_click_listener<F>(element: &Element, callback: F) -> Result<(), JsValue>
where
    F: FnMut() + 'static,
{
    use wasm_bindgen::closure::Closure;

    let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut()>);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget(); // Keep the closure alive
    Ok(())
}

/// Show element as a block
pub fn show_block(element: &HtmlElement) {
    let _ = element.style().set_property("display", "block");
}

/// Show element as a flex container
pub fn show_flex(element: &HtmlElement) {
    let _ = element.style().set_property("display", "flex");
}

/// Hide element
pub fn hide(element: &HtmlElement) {
    let _ = element.style().set_property("display", "none");
}

/// Scroll element to bottom
pub fn scroll_to_bottom(element: &Element) {
    if let Ok(html_element) = element.clone().dyn_into::<HtmlElement>() {
        html_element.set_scroll_top(html_element.scroll_height());
    }
}
