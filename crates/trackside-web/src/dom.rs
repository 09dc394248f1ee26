use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn device_pixel_ratio() -> f64 {
    web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0)
}

pub fn prefers_reduced_motion() -> bool {
    web::window()
        .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// CSS box of `el` as (width, height).
#[inline]
pub fn client_size(el: &web::Element) -> (f64, f64) {
    (el.client_width() as f64, el.client_height() as f64)
}

/// Create an element, optionally with a class attribute.
pub fn create(document: &web::Document, tag: &str, class: &str) -> Option<web::HtmlElement> {
    let el = document.create_element(tag).ok()?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    el.dyn_into::<web::HtmlElement>().ok()
}

/// Create a button labelled `text` with `class`.
pub fn button(document: &web::Document, class: &str, text: &str) -> Option<web::HtmlElement> {
    let el = create(document, "button", class)?;
    _ = el.set_attribute("type", "button");
    el.set_text_content(Some(text));
    Some(el)
}

pub fn query(root: &web::Element, selector: &str) -> Option<web::Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn set_class(el: &web::Element, class: &str, on: bool) {
    let list = el.class_list();
    _ = if on {
        list.add_1(class)
    } else {
        list.remove_1(class)
    };
}

/// An event listener that stays attached until [`Listener::detach`] or drop.
pub struct Listener<T: ?Sized> {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<T>,
    attached: bool,
}

impl<T: ?Sized> Listener<T> {
    pub fn attach(target: &web::EventTarget, event: &'static str, closure: Closure<T>) -> Self {
        _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            closure,
            attached: true,
        }
    }

    pub fn detach(&mut self) {
        if self.attached {
            _ = self
                .target
                .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
            self.attached = false;
        }
    }
}

impl<T: ?Sized> Drop for Listener<T> {
    fn drop(&mut self) {
        self.detach();
    }
}
