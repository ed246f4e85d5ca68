//! The slice of the browser DOM that the page behaviours touch.
//!
//! Everything in [`crate::scroll`] and [`crate::modal`] is written against
//! [`Page`] and [`Element`] so it can run on the real document
//! ([`web::WebPage`]) or on the in-memory document used by the tests.

pub mod web;

pub const CLICK: &str = "click";
pub const KEYDOWN: &str = "keydown";

/// What a handler can see of the event that triggered it.
pub trait DomEvent {
    /// `KeyboardEvent.key`, `None` for anything that is not a key press.
    fn key(&self) -> Option<String>;
    fn prevent_default(&self);
}

pub type Handler = Box<dyn FnMut(&dyn DomEvent)>;

pub trait Element: Clone + PartialEq + 'static {
    /// Descendants matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self>;

    fn query(&self, selector: &str) -> Option<Self> {
        self.query_all(selector).into_iter().next()
    }

    fn attribute(&self, name: &str) -> Option<String>;

    fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    fn set_attribute(&self, name: &str, value: &str);
    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn text(&self) -> Option<String>;

    /// Sets the inline `display` style.
    fn set_display(&self, display: &str);

    /// Moves keyboard focus here without scrolling the page.
    fn focus_without_scroll(&self);

    /// Top edge of the bounding box, relative to the viewport.
    fn viewport_top(&self) -> f64;

    /// Scrolls the page in one step so the element sits at the top.
    fn jump_into_view(&self);

    /// Attaches a listener for the lifetime of the page.
    fn listen(&self, event: &'static str, handler: Handler);
}

pub trait Page: 'static {
    type Element: Element;
    /// Keeps a requested frame alive; dropping it may cancel the frame.
    type Frame: 'static;

    /// The `<html>` element.
    fn root(&self) -> Option<Self::Element>;
    fn body(&self) -> Option<Self::Element>;
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Attaches a document-level listener for the lifetime of the page.
    fn listen(&self, event: &'static str, handler: Handler);

    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, y: f64);
    fn prefers_reduced_motion(&self) -> bool;
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) -> Self::Frame;
}

/// `Enter` and space are how keyboard users press a `role="button"`.
pub fn is_activation_key(event: &dyn DomEvent) -> bool {
    matches!(event.key().as_deref(), Some("Enter") | Some(" "))
}
