use crate::dom;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;
use trackside_core::{TransitionAction, TransitionController};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

const LOADER_SELECTOR: &str = ".route-loader";
const LOADER_ACTIVE_CLASS: &str = "is-active";

struct TransitionState {
    controller: TransitionController,
    on_push: js_sys::Function,
    timer: Option<i32>,
    tick: Option<Closure<dyn FnMut()>>,
}

fn set_loader(active: bool) {
    let loader = dom::window_document().and_then(|d| d.query_selector(LOADER_SELECTOR).ok().flatten());
    if let Some(el) = loader {
        dom::set_class(&el, LOADER_ACTIVE_CLASS, active);
    }
}

impl TransitionState {
    fn clear_timer(&mut self) {
        if let (Some(handle), Some(w)) = (self.timer.take(), web::window()) {
            w.clear_timeout_with_handle(handle);
        }
    }

    /// Arm a single timeout for the controller's next deadline.
    fn schedule(&mut self) {
        self.clear_timer();
        let (Some(deadline), Some(tick), Some(w)) =
            (self.controller.next_deadline(), self.tick.as_ref(), web::window())
        else {
            return;
        };
        let now = Instant::now();
        let delay = if deadline > now {
            deadline - now
        } else {
            Duration::ZERO
        };
        self.timer = w
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                delay.as_millis().min(i32::MAX as u128) as i32,
            )
            .ok();
    }
}

fn tick_callback(state: Weak<RefCell<TransitionState>>) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let Some(state) = state.upgrade() else {
            return;
        };
        let (actions, on_push) = {
            let mut s = state.borrow_mut();
            s.timer = None;
            (s.controller.poll(Instant::now()), s.on_push.clone())
        };
        // the router may call back into path_changed, so no borrow is held here
        for action in actions {
            match action {
                TransitionAction::Push(href) => {
                    if let Err(e) = on_push.call1(&JsValue::NULL, &JsValue::from_str(&href)) {
                        log::error!("[transition] route push failed: {:?}", e);
                    }
                }
                TransitionAction::Settled => {
                    set_loader(false);
                    log::info!("[transition] settled");
                }
            }
        }
        state.borrow_mut().schedule();
    }) as Box<dyn FnMut()>)
}

/// Delayed internal navigation with a route loader overlay.
#[wasm_bindgen]
pub struct PageTransitions {
    state: Rc<RefCell<TransitionState>>,
}

#[wasm_bindgen]
impl PageTransitions {
    /// `on_push` performs the actual route change and receives the href.
    #[wasm_bindgen(constructor)]
    pub fn new(current_path: String, on_push: js_sys::Function) -> PageTransitions {
        let state = Rc::new(RefCell::new(TransitionState {
            controller: TransitionController::new(current_path),
            on_push,
            timer: None,
            tick: None,
        }));
        let tick = tick_callback(Rc::downgrade(&state));
        state.borrow_mut().tick = Some(tick);
        PageTransitions { state }
    }

    /// Start a transition to `href`. Returns false when it was ignored.
    pub fn navigate(&self, href: &str) -> bool {
        let mut s = self.state.borrow_mut();
        let accepted = s.controller.navigate(href, Instant::now());
        if accepted {
            set_loader(true);
            s.schedule();
        }
        accepted
    }

    #[wasm_bindgen(getter = isTransitioning)]
    pub fn is_transitioning(&self) -> bool {
        self.state.borrow().controller.is_transitioning()
    }

    /// The router reports the path it landed on.
    pub fn path_changed(&self, path: String) {
        let mut s = self.state.borrow_mut();
        s.controller.path_changed(path, Instant::now());
        s.schedule();
    }

    pub fn dispose(&self) {
        let mut s = self.state.borrow_mut();
        s.controller.cancel();
        s.clear_timer();
        set_loader(false);
    }
}
