use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo_render::{request_animation_frame, AnimationFrame};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Function, Object, Reflect};
use web_sys::{Document, Event, EventTarget, HtmlElement, KeyboardEvent, NodeList, Window};

use super::{DomEvent, Element, Handler, Page};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The live browser document.
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }
}

#[derive(Clone, Debug)]
pub struct WebElement(web_sys::Element);

impl PartialEq for WebElement {
    fn eq(&self, other: &Self) -> bool {
        let this: &JsValue = self.0.as_ref();
        let other: &JsValue = other.0.as_ref();
        this == other
    }
}

struct WebEvent<'a>(&'a Event);

impl DomEvent for WebEvent<'_> {
    fn key(&self) -> Option<String> {
        self.0.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key)
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

/// Handlers call `prevent_default`, which a passive listener ignores.
fn listener_options() -> EventListenerOptions {
    EventListenerOptions {
        phase: EventListenerPhase::Bubble,
        passive: false,
    }
}

fn attach(target: &EventTarget, event: &'static str, mut handler: Handler) {
    EventListener::new_with_options(target, event, listener_options(), move |event| {
        handler(&WebEvent(event))
    })
    .forget();
}

// A selector the browser rejects matches nothing.
fn collect(list: Result<NodeList, JsValue>) -> Vec<WebElement> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(WebElement)
        .collect()
}

impl Element for WebElement {
    fn query_all(&self, selector: &str) -> Vec<Self> {
        collect(self.0.query_selector_all(selector))
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = self.0.set_attribute(name, value);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn text(&self) -> Option<String> {
        self.0.text_content()
    }

    fn set_display(&self, display: &str) {
        if let Some(element) = self.0.dyn_ref::<HtmlElement>() {
            let _ = element.style().set_property("display", display);
        }
    }

    fn focus_without_scroll(&self) {
        // Called through Reflect so elements without a focus method are skipped.
        let Ok(focus) = Reflect::get(self.0.as_ref(), &"focus".into()) else {
            return;
        };
        let Ok(focus) = focus.dyn_into::<Function>() else {
            return;
        };
        let options = Object::new();
        let _ = Reflect::set(&options, &"preventScroll".into(), &JsValue::TRUE);
        let _ = focus.call1(self.0.as_ref(), &options);
    }

    fn viewport_top(&self) -> f64 {
        self.0.get_bounding_client_rect().top()
    }

    fn jump_into_view(&self) {
        self.0.scroll_into_view_with_bool(true);
    }

    fn listen(&self, event: &'static str, handler: Handler) {
        attach(&self.0, event, handler);
    }
}

impl Page for WebPage {
    type Element = WebElement;
    type Frame = AnimationFrame;

    fn root(&self) -> Option<WebElement> {
        self.document.document_element().map(WebElement)
    }

    fn body(&self) -> Option<WebElement> {
        self.document.body().map(|body| WebElement(body.into()))
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        collect(self.document.query_selector_all(selector))
    }

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn listen(&self, event: &'static str, handler: Handler) {
        attach(&self.document, event, handler);
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn prefers_reduced_motion(&self) -> bool {
        matches!(
            self.window.match_media(REDUCED_MOTION_QUERY),
            Ok(Some(query)) if query.matches()
        )
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> AnimationFrame {
        request_animation_frame(callback)
    }
}
