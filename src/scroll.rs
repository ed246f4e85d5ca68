//! Animated scrolling for same-page anchor links.

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::config::ScrollConfig;
use crate::dom::{Element, Page, CLICK};

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Where one animation frame puts the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub position: f64,
    pub done: bool,
}

/// Position over time for a single scroll from `start_y` to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    start_y: f64,
    distance: f64,
    duration_ms: f64,
    started_at: Option<f64>,
}

impl ScrollAnimation {
    pub fn new(start_y: f64, target_y: f64, duration_ms: f64) -> Self {
        Self {
            start_y,
            distance: target_y - start_y,
            duration_ms,
            started_at: None,
        }
    }

    pub fn target_y(&self) -> f64 {
        self.start_y + self.distance
    }

    /// The first call fixes the start time, so it always yields `start_y`
    /// unless the duration is zero.
    pub fn frame(&mut self, timestamp: f64) -> FrameStep {
        let started_at = *self.started_at.get_or_insert(timestamp);
        let elapsed = timestamp - started_at;
        let progress = if self.duration_ms > 0.0 {
            (elapsed / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        FrameStep {
            position: self.start_y + self.distance * ease_out_cubic(progress),
            done: progress >= 1.0,
        }
    }
}

struct Run<P: Page> {
    page: Rc<P>,
    animation: RefCell<ScrollAnimation>,
    frame: RefCell<Option<P::Frame>>,
}

impl<P: Page> Run<P> {
    fn schedule(self: &Rc<Self>) {
        let run = Rc::clone(self);
        let handle = self.page.request_frame(Box::new(move |timestamp| run.step(timestamp)));
        *self.frame.borrow_mut() = Some(handle);
    }

    fn step(self: &Rc<Self>, timestamp: f64) {
        self.frame.borrow_mut().take();
        let step = self.animation.borrow_mut().frame(timestamp);
        self.page.scroll_to(step.position);
        if !step.done {
            self.schedule();
        }
    }
}

/// Scrolls `target` to the top of the viewport over `duration_ms`, or in a
/// single jump when the visitor asked for reduced motion.
///
/// A running animation is not cancelled by a new one; both keep scrolling
/// until they finish.
pub fn scroll_to_element<P: Page>(page: &Rc<P>, target: &P::Element, duration_ms: f64) {
    if page.prefers_reduced_motion() {
        target.jump_into_view();
        return;
    }

    let start_y = page.scroll_y();
    let target_y = start_y + target.viewport_top();
    let run = Rc::new(Run {
        page: Rc::clone(page),
        animation: RefCell::new(ScrollAnimation::new(start_y, target_y, duration_ms)),
        frame: RefCell::new(None),
    });
    run.schedule();
}

/// Binds every anchor link present now; returns how many were bound.
pub fn install<P: Page>(page: &Rc<P>, config: &ScrollConfig) -> usize {
    let mut bound = 0;
    for link in page.query_all(&config.anchor_selector) {
        let Some(href) = link.attribute("href") else {
            continue;
        };
        let target_id = match href.strip_prefix('#') {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => continue,
        };

        let page = Rc::clone(page);
        let duration_ms = config.duration_ms;
        link.listen(
            CLICK,
            Box::new(move |event| {
                // Resolved per click; a missing target falls back to the browser.
                if let Some(target) = page.element_by_id(&target_id) {
                    event.prevent_default();
                    scroll_to_element(&page, &target, duration_ms);
                }
            }),
        );
        bound += 1;
    }
    debug!("smooth scroll bound to {} anchor links", bound);
    bound
}
