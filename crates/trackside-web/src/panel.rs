use crate::dom::{self, Listener};
use crate::render::GpuState;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use trackside_core::constants::{FALLBACK_EYEBROW, FALLBACK_HINT, FALLBACK_TITLE};
use trackside_core::{
    Bounds, FrameClock, HudReadout, PanelHost, PanelLifecycle, PanelPhase, SceneLayout,
    SceneSurface, Viewport,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

type SharedPanel = Rc<RefCell<PanelLifecycle<DomHost>>>;
type WeakPanel = Weak<RefCell<PanelLifecycle<DomHost>>>;
type PointerClosure = Closure<dyn FnMut(web::PointerEvent)>;

const CANVAS_CLASS: &str = "track3d-canvas";
const FALLBACK_CLASS: &str = "track3d-fallback";
const HUD_KEYS: [&str; 4] = ["speed", "throttle", "brake", "lateral"];

/// Callbacks created once per panel, attached on `connect`.
struct Callbacks {
    frame: Closure<dyn FnMut()>,
    resize: Closure<dyn FnMut()>,
    pointer_move: Option<PointerClosure>,
    pointer_leave: Option<PointerClosure>,
}

/// Browser side of the panel: canvas, frame scheduling, observers, HUD.
pub struct DomHost {
    container: web::HtmlElement,
    canvas: web::HtmlCanvasElement,
    hud: [Option<web::Element>; 4],
    callbacks: Option<Callbacks>,
    observer: Option<web::ResizeObserver>,
    listeners: Vec<Listener<dyn FnMut(web::PointerEvent)>>,
}

impl DomHost {
    fn new(container: web::HtmlElement, canvas: web::HtmlCanvasElement) -> Self {
        let hud = HUD_KEYS.map(|key| dom::query(&container, &format!("[data-hud=\"{key}\"]")));
        Self {
            container,
            canvas,
            hud,
            callbacks: None,
            observer: None,
            listeners: Vec::new(),
        }
    }
}

impl PanelHost for DomHost {
    type Surface = GpuState;
    type FrameHandle = i32;

    fn viewport(&self) -> Viewport {
        let (w, h) = dom::client_size(&self.container);
        Viewport::new(w, h, dom::device_pixel_ratio())
    }

    fn prefers_reduced_motion(&self) -> bool {
        dom::prefers_reduced_motion()
    }

    fn request_frame(&mut self) -> Option<i32> {
        let cb = self.callbacks.as_ref()?;
        web::window()?
            .request_animation_frame(cb.frame.as_ref().unchecked_ref())
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle);
        }
    }

    fn connect(&mut self) {
        let Some(cb) = self.callbacks.as_mut() else {
            return;
        };
        match web::ResizeObserver::new(cb.resize.as_ref().unchecked_ref()) {
            Ok(observer) => {
                observer.observe(&self.container);
                self.observer = Some(observer);
            }
            Err(e) => log::warn!("[panel] ResizeObserver unavailable: {:?}", e),
        }
        let target: &web::EventTarget = self.container.as_ref();
        if let Some(c) = cb.pointer_move.take() {
            self.listeners.push(Listener::attach(target, "pointermove", c));
        }
        if let Some(c) = cb.pointer_leave.take() {
            self.listeners.push(Listener::attach(target, "pointerleave", c));
        }
    }

    fn disconnect(&mut self) {
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        for l in self.listeners.iter_mut() {
            l.detach();
        }
    }

    fn show_fallback(&mut self) {
        match dom::query(&self.container, "[data-panel-fallback]") {
            Some(el) => dom::set_class(&el, "hidden", false),
            None => {
                if build_fallback(&self.container).is_none() {
                    log::warn!("[panel] could not build fallback view");
                }
            }
        }
    }

    fn remove_surface(&mut self) {
        self.canvas.remove();
    }

    fn publish_hud(&mut self, hud: &HudReadout) {
        let texts = [
            hud.speed_text(),
            hud.throttle_text(),
            hud.brake_text(),
            hud.lateral_text(),
        ];
        for (el, text) in self.hud.iter().zip(texts) {
            if let Some(el) = el {
                el.set_text_content(Some(&text));
            }
        }
    }
}

/// Static panel used when the page did not supply its own fallback markup.
fn build_fallback(container: &web::HtmlElement) -> Option<()> {
    let document = dom::window_document()?;
    let root = dom::create(&document, "div", FALLBACK_CLASS)?;
    _ = root.set_attribute("data-panel-fallback", "");
    for (class, text) in [
        ("track3d-fallback__eyebrow", FALLBACK_EYEBROW),
        ("track3d-fallback__title", FALLBACK_TITLE),
        ("track3d-fallback__hint", FALLBACK_HINT),
    ] {
        let line = dom::create(&document, "p", class)?;
        line.set_text_content(Some(text));
        root.append_child(&line).ok()?;
    }
    container.append_child(&root).ok()?;
    Some(())
}

fn frame_callback(panel: WeakPanel) -> Closure<dyn FnMut()> {
    let mut clock = FrameClock::default();
    Closure::wrap(Box::new(move || {
        let Some(panel) = panel.upgrade() else {
            return;
        };
        let dt = clock.tick(Instant::now());
        panel.borrow_mut().on_frame(dt);
    }) as Box<dyn FnMut()>)
}

fn resize_callback(panel: WeakPanel) -> Closure<dyn FnMut()> {
    Closure::wrap(Box::new(move || {
        let Some(panel) = panel.upgrade() else {
            return;
        };
        let mut p = panel.borrow_mut();
        let (w, h) = dom::client_size(&p.host().container);
        p.on_viewport(w, h, dom::device_pixel_ratio());
    }) as Box<dyn FnMut()>)
}

fn pointer_callbacks(panel: &WeakPanel) -> (PointerClosure, PointerClosure) {
    let weak = panel.clone();
    let on_move = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let Some(panel) = weak.upgrade() else {
            return;
        };
        let mut p = panel.borrow_mut();
        let rect = p.host().container.get_bounding_client_rect();
        let bounds = Bounds {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        };
        p.on_pointer_move(ev.client_x() as f64, ev.client_y() as f64, bounds);
    }) as Box<dyn FnMut(web::PointerEvent)>);
    let weak = panel.clone();
    let on_leave = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        if let Some(panel) = weak.upgrade() {
            panel.borrow_mut().on_pointer_leave();
        }
    }) as Box<dyn FnMut(web::PointerEvent)>);
    (on_move, on_leave)
}

fn attach_canvas(container: &web::HtmlElement) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    canvas.set_class_name(CANVAS_CLASS);
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    Ok(canvas)
}

/// Animated telemetry panel mounted into a host element.
#[wasm_bindgen]
pub struct TrackPanel {
    inner: SharedPanel,
}

#[wasm_bindgen]
impl TrackPanel {
    /// Attach a canvas to `container` and start the render loop once the GPU
    /// is ready. Falls back to the static panel when WebGPU is missing.
    pub fn mount(container: web::HtmlElement) -> Result<TrackPanel, JsValue> {
        let canvas =
            attach_canvas(&container).map_err(|e| JsValue::from_str(&format!("{:?}", e)))?;

        let inner: SharedPanel = Rc::new(RefCell::new(PanelLifecycle::new(DomHost::new(
            container,
            canvas.clone(),
        ))));
        let weak = Rc::downgrade(&inner);
        let (pointer_move, pointer_leave) = pointer_callbacks(&weak);
        let viewport = {
            let mut p = inner.borrow_mut();
            p.host_mut().callbacks = Some(Callbacks {
                frame: frame_callback(weak.clone()),
                resize: resize_callback(weak.clone()),
                pointer_move: Some(pointer_move),
                pointer_leave: Some(pointer_leave),
            });
            p.viewport()
        };

        spawn_local(async move {
            let result = GpuState::new(canvas, viewport, SceneLayout::default()).await;
            match weak.upgrade() {
                Some(panel) => panel.borrow_mut().mount(result),
                None => {
                    if let Ok(mut gpu) = result {
                        gpu.release();
                    }
                }
            }
        });
        Ok(TrackPanel { inner })
    }

    /// Stop the loop and release everything. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.inner.borrow_mut().unmount();
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.borrow().phase() == PanelPhase::Running
    }
}

impl Drop for TrackPanel {
    fn drop(&mut self) {
        if let Ok(mut p) = self.inner.try_borrow_mut() {
            p.unmount();
        }
    }
}
