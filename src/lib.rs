//! Progressive enhancement for the static site: smooth anchor scrolling and
//! card popups. Pages without the expected markup are left as they are.

use std::rc::Rc;

use log::debug;

pub mod config;
pub mod dom;
pub mod modal;
pub mod scroll;

use config::SiteConfig;
use dom::{web::WebPage, Element, Page};
use modal::ModalManager;

/// Set on `<html>` so stylesheets can drop their no-script fallbacks.
pub const CUSTOM_JS_CLASS: &str = "has-custom-js";

pub struct Enhancements<P: Page> {
    pub anchors: usize,
    /// `None` when the page has no body.
    pub modals: Option<Rc<ModalManager<P>>>,
}

pub fn enhance<P: Page>(page: &Rc<P>, config: &SiteConfig) -> Enhancements<P> {
    if let Some(root) = page.root() {
        if !root.has_class(CUSTOM_JS_CLASS) {
            root.add_class(CUSTOM_JS_CLASS);
        }
    }

    let anchors = scroll::install(page, &config.scroll);
    let modals = modal::install(page, &config.modal_groups);
    if modals.is_none() {
        debug!("page has no body, modals disabled");
    }
    Enhancements { anchors, modals }
}

/// Enhances the live document.
pub fn start() {
    let Some(page) = WebPage::new() else {
        return;
    };
    let page = Rc::new(page);
    let config = config::load(page.as_ref());
    enhance(&page, &config);
}
