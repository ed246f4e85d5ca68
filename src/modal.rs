//! Card-to-modal popups: each card opens the modal paired with it, and at
//! most one modal is open at a time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::debug;

use crate::config::ModalGroup;
use crate::dom::{is_activation_key, Element, Page, CLICK, KEYDOWN};

pub const MODAL_CARD_CLASS: &str = "modal-card";
pub const MODAL_CLOSE_CLASS: &str = "modal-card-close";
pub const OPEN_CLASS: &str = "is-open";
pub const BODY_OPEN_CLASS: &str = "modal-open";

fn non_empty(selector: &Option<String>) -> Option<&str> {
    selector.as_deref().filter(|selector| !selector.is_empty())
}

/// Makes a non-button element reachable and pressable from the keyboard.
/// Existing `tabindex` and `role` values are left alone.
fn make_pressable<E: Element>(element: &E, class: &str, on_press: impl Fn() + 'static) {
    element.add_class(class);
    if !element.has_attribute("tabindex") {
        element.set_attribute("tabindex", "0");
    }
    if !element.has_attribute("role") {
        element.set_attribute("role", "button");
    }

    let on_press = Rc::new(on_press);
    let on_click = Rc::clone(&on_press);
    element.listen(CLICK, Box::new(move |_| on_click()));
    element.listen(
        KEYDOWN,
        Box::new(move |event| {
            if is_activation_key(event) {
                event.prevent_default();
                on_press();
            }
        }),
    );
}

/// Owns the single active-modal slot for a page.
pub struct ModalManager<P: Page> {
    page: Rc<P>,
    body: P::Element,
    active: RefCell<Option<P::Element>>,
    escape_bound: Cell<bool>,
}

impl<P: Page> ModalManager<P> {
    /// `None` when the page has no `<body>` to mark.
    pub fn new(page: Rc<P>) -> Option<Rc<Self>> {
        let body = page.body()?;
        Some(Rc::new(Self {
            page,
            body,
            active: RefCell::new(None),
            escape_bound: Cell::new(false),
        }))
    }

    pub fn active(&self) -> Option<P::Element> {
        self.active.borrow().clone()
    }

    pub fn close(&self, modal: &P::Element) {
        modal.set_display("none");
        modal.set_attribute("aria-hidden", "true");
        modal.remove_class(OPEN_CLASS);

        let was_active = self.active.borrow().as_ref() == Some(modal);
        if was_active {
            self.active.borrow_mut().take();
            self.body.remove_class(BODY_OPEN_CLASS);
        }
    }

    /// Closes the open modal, if any. Returns whether one was open.
    pub fn close_active(&self) -> bool {
        match self.active() {
            Some(modal) => {
                self.close(&modal);
                true
            }
            None => false,
        }
    }

    pub fn open(&self, modal: &P::Element, group: &ModalGroup) {
        if let Some(previous) = self.active() {
            if previous != *modal {
                self.close(&previous);
            }
        }

        modal.set_display(group.open_display());
        modal.set_attribute("aria-hidden", "false");
        modal.add_class(OPEN_CLASS);
        self.body.add_class(BODY_OPEN_CLASS);
        *self.active.borrow_mut() = Some(modal.clone());

        let focus_target = non_empty(&group.focus_selector)
            .and_then(|selector| modal.query(selector))
            .or_else(|| {
                non_empty(&group.close_selector).and_then(|selector| modal.query(selector))
            });
        if let Some(target) = focus_target {
            target.focus_without_scroll();
        }
    }

    /// Binds `group`, filtering modal candidates with its [`ModalFilter`].
    ///
    /// [`ModalFilter`]: crate::config::ModalFilter
    pub fn bind_group(self: &Rc<Self>, group: ModalGroup) -> usize {
        let filter = group.filter.clone();
        self.bind_group_with(group, move |modal| filter.accepts(modal))
    }

    /// Pairs the n-th card with the n-th accepted modal and wires both up.
    /// Returns the number of pairs; zero means nothing was touched.
    pub fn bind_group_with<F>(self: &Rc<Self>, group: ModalGroup, accepts: F) -> usize
    where
        F: Fn(&P::Element) -> bool,
    {
        if group.card_selector.is_empty() || group.modal_selector.is_empty() {
            return 0;
        }

        let cards = self.page.query_all(&group.card_selector);
        if cards.is_empty() {
            debug!("no cards match {}", group.card_selector);
            return 0;
        }

        let modals: Vec<_> = self
            .page
            .query_all(&group.modal_selector)
            .into_iter()
            .filter(|modal| accepts(modal))
            .collect();
        if modals.is_empty() {
            debug!("no modals accepted for {}", group.card_selector);
            return 0;
        }

        let pairs = cards.len().min(modals.len());
        let group = Rc::new(group);
        for (card, modal) in cards.into_iter().zip(modals) {
            self.close(&modal);

            if let Some(selector) = non_empty(&group.overlay_selector) {
                for overlay in modal.query_all(selector) {
                    let manager = Rc::clone(self);
                    let modal = modal.clone();
                    overlay.listen(CLICK, Box::new(move |_| manager.close(&modal)));
                }
            }

            if let Some(selector) = non_empty(&group.close_selector) {
                for closer in modal.query_all(selector) {
                    let manager = Rc::clone(self);
                    let modal = modal.clone();
                    make_pressable(&closer, MODAL_CLOSE_CLASS, move || manager.close(&modal));
                }
            }

            let manager = Rc::clone(self);
            let group = Rc::clone(&group);
            make_pressable(&card, MODAL_CARD_CLASS, move || manager.open(&modal, &group));
        }

        debug!("paired {} cards for {}", pairs, group.card_selector);
        pairs
    }

    /// Lets Escape close whatever modal is open. Only the first call
    /// registers a listener.
    pub fn bind_escape(self: &Rc<Self>) {
        if self.escape_bound.replace(true) {
            return;
        }
        let manager = Rc::clone(self);
        self.page.listen(
            KEYDOWN,
            Box::new(move |event| {
                if event.key().as_deref() == Some("Escape") {
                    manager.close_active();
                }
            }),
        );
    }
}

/// Binds every group and, if any of them paired a card, the Escape key.
pub fn install<P: Page>(page: &Rc<P>, groups: &[ModalGroup]) -> Option<Rc<ModalManager<P>>> {
    let manager = ModalManager::new(Rc::clone(page))?;
    let mut bound_any = false;
    for group in groups {
        if manager.bind_group(group.clone()) > 0 {
            bound_any = true;
        }
    }
    if bound_any {
        manager.bind_escape();
    }
    Some(manager)
}
