// Host-side tests for the panel lifecycle, driven by a synthetic host.

use std::cell::RefCell;
use std::rc::Rc;
use trackside_core::*;

#[derive(Default, Debug)]
struct Log {
    next_handle: u32,
    scheduled: Vec<u32>,
    cancelled: Vec<u32>,
    connected: bool,
    connect_calls: u32,
    disconnect_calls: u32,
    fallback_shown: bool,
    surface_attached: bool,
    huds: Vec<HudReadout>,
    draws: u32,
    resizes: Vec<(u32, u32)>,
    released: u32,
}

impl Log {
    /// Frames that were scheduled and never cancelled or consumed.
    fn live_frames(&self) -> usize {
        self.scheduled
            .iter()
            .filter(|h| !self.cancelled.contains(h))
            .count()
    }
}

struct FakeSurface(Rc<RefCell<Log>>);

impl SceneSurface for FakeSurface {
    type Error = String;

    fn resize(&mut self, viewport: &Viewport) {
        self.0.borrow_mut().resizes.push(viewport.backing_size());
    }

    fn draw(&mut self, _frame: &SceneFrame, _camera: &Camera) -> Result<(), String> {
        self.0.borrow_mut().draws += 1;
        Ok(())
    }

    fn release(&mut self) {
        self.0.borrow_mut().released += 1;
    }
}

struct FakeHost {
    log: Rc<RefCell<Log>>,
    reduced_motion: bool,
    size: (f64, f64),
}

impl PanelHost for FakeHost {
    type Surface = FakeSurface;
    type FrameHandle = u32;

    fn viewport(&self) -> Viewport {
        Viewport::new(self.size.0, self.size.1, 1.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_frame(&mut self) -> Option<u32> {
        let mut log = self.log.borrow_mut();
        log.next_handle += 1;
        let h = log.next_handle;
        log.scheduled.push(h);
        Some(h)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.log.borrow_mut().cancelled.push(handle);
    }

    fn connect(&mut self) {
        let mut log = self.log.borrow_mut();
        log.connected = true;
        log.connect_calls += 1;
    }

    fn disconnect(&mut self) {
        let mut log = self.log.borrow_mut();
        log.connected = false;
        log.disconnect_calls += 1;
    }

    fn show_fallback(&mut self) {
        self.log.borrow_mut().fallback_shown = true;
    }

    fn remove_surface(&mut self) {
        self.log.borrow_mut().surface_attached = false;
    }

    fn publish_hud(&mut self, hud: &HudReadout) {
        self.log.borrow_mut().huds.push(*hud);
    }
}

fn panel(size: (f64, f64)) -> (PanelLifecycle<FakeHost>, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log {
        surface_attached: true,
        ..Log::default()
    }));
    let host = FakeHost {
        log: log.clone(),
        reduced_motion: false,
        size,
    };
    (PanelLifecycle::new(host), log)
}

fn surface(log: &Rc<RefCell<Log>>) -> Result<FakeSurface, BackendError> {
    Ok(FakeSurface(log.clone()))
}

/// Fire the most recently scheduled frame, as a browser would.
fn fire(p: &mut PanelLifecycle<FakeHost>, log: &Rc<RefCell<Log>>, dt: f32) {
    let last = log.borrow().scheduled.last().copied();
    if let Some(h) = last {
        if !log.borrow().cancelled.contains(&h) {
            log.borrow_mut().cancelled.push(h); // consumed
            p.on_frame(dt);
        }
    }
}

#[test]
fn mount_starts_loop_and_sizes_surface() {
    let (mut p, log) = panel((640.0, 360.0));
    p.mount(surface(&log));
    assert_eq!(p.phase(), PanelPhase::Running);
    let l = log.borrow();
    assert!(l.connected);
    assert_eq!(l.scheduled.len(), 1);
    assert_eq!(l.resizes, vec![(640, 360)]);
    assert!((p.camera().aspect - 640.0 / 360.0).abs() < 1e-5);
}

#[test]
fn zero_sized_container_falls_back_to_one_pixel() {
    let (mut p, log) = panel((0.0, 0.0));
    p.mount(surface(&log));
    assert_eq!(log.borrow().resizes, vec![(1, 1)]);
}

#[test]
fn frames_draw_and_reschedule() {
    let (mut p, log) = panel((300.0, 200.0));
    p.mount(surface(&log));
    for _ in 0..12 {
        fire(&mut p, &log, 1.0 / 60.0);
    }
    let l = log.borrow();
    assert_eq!(l.draws, 12);
    assert_eq!(l.live_frames(), 1);
    assert_eq!(l.huds.len(), 2);
}

#[test]
fn immediate_unmount_leaves_nothing_behind() {
    let (mut p, log) = panel((300.0, 200.0));
    p.mount(surface(&log));
    p.unmount();

    {
        let l = log.borrow();
        assert_eq!(l.live_frames(), 0);
        assert!(!l.connected);
        assert!(!l.surface_attached);
        assert_eq!(l.released, 1);
    }
    assert_eq!(p.phase(), PanelPhase::Disposed);
    assert!(!p.has_pending_frame());

    // a stray callback after teardown does nothing
    p.on_frame(0.016);
    p.on_resize(800.0, 600.0);
    p.on_pointer_leave();
    let l = log.borrow();
    assert_eq!(l.draws, 0);
    assert_eq!(l.scheduled.len(), 1);
    assert_eq!(l.resizes.len(), 1);
}

#[test]
fn unmount_twice_is_a_no_op() {
    let (mut p, log) = panel((300.0, 200.0));
    p.mount(surface(&log));
    fire(&mut p, &log, 0.016);
    p.unmount();
    p.unmount();
    let l = log.borrow();
    assert_eq!(l.released, 1);
    assert_eq!(l.disconnect_calls, 1);
    assert_eq!(l.live_frames(), 0);
}

#[test]
fn missing_backend_shows_fallback_without_loop() {
    let (mut p, log) = panel((300.0, 200.0));
    p.mount(Err(BackendError::NoAdapter));
    assert_eq!(p.phase(), PanelPhase::Fallback);
    {
        let l = log.borrow();
        assert!(l.fallback_shown);
        assert!(l.scheduled.is_empty());
        assert_eq!(l.connect_calls, 0);
        assert!(!l.surface_attached);
    }
    p.on_frame(0.016);
    assert_eq!(log.borrow().draws, 0);
    p.unmount();
    assert_eq!(log.borrow().disconnect_calls, 0);
}

#[test]
fn surface_arriving_after_unmount_is_released() {
    let (mut p, log) = panel((300.0, 200.0));
    p.unmount();
    p.mount(surface(&log));
    let l = log.borrow();
    assert_eq!(l.released, 1);
    assert!(l.scheduled.is_empty());
    assert!(!l.connected);
    assert_eq!(p.phase(), PanelPhase::Disposed);
}

#[test]
fn resize_updates_surface_and_aspect() {
    let (mut p, log) = panel((300.0, 300.0));
    p.mount(surface(&log));
    p.on_resize(1200.0, 400.0);
    assert_eq!(log.borrow().resizes.last(), Some(&(1200, 400)));
    assert!((p.camera().aspect - 3.0).abs() < 1e-5);
    p.on_viewport(1200.0, 400.0, 2.0);
    assert_eq!(log.borrow().resizes.last(), Some(&(2400, 800)));
    // later size-only changes keep the ratio
    p.on_resize(600.0, 300.0);
    assert_eq!(log.borrow().resizes.last(), Some(&(1200, 600)));
}

#[test]
fn ratio_and_size_change_resize_surface_once() {
    let (mut p, log) = panel((400.0, 200.0));
    p.mount(surface(&log));
    let before = log.borrow().resizes.len();
    p.on_viewport(800.0, 400.0, 2.0);
    let l = log.borrow();
    assert_eq!(l.resizes.len(), before + 1);
    assert_eq!(l.resizes.last(), Some(&(1600, 800)));
}

#[test]
fn pointer_leave_returns_camera_to_rest() {
    let (mut p, log) = panel((200.0, 100.0));
    p.mount(surface(&log));
    let bounds = Bounds {
        left: 0.0,
        top: 0.0,
        width: 200.0,
        height: 100.0,
    };
    p.on_pointer_move(200.0, 0.0, bounds);
    for _ in 0..120 {
        fire(&mut p, &log, 1.0 / 60.0);
    }
    let swayed = p.camera().eye.x;
    assert!(swayed > 5.0);

    p.on_pointer_leave();
    let mut prev = swayed;
    for _ in 0..240 {
        fire(&mut p, &log, 1.0 / 60.0);
        let x = p.camera().eye.x;
        assert!(x <= prev && x >= 0.0);
        prev = x;
    }
    assert!(prev < 1e-3);
}

#[test]
fn mount_picks_up_size_changed_while_pending() {
    let (mut p, log) = panel((320.0, 200.0));
    p.host_mut().size = (900.0, 300.0);
    p.mount(surface(&log));
    assert_eq!(log.borrow().resizes.first(), Some(&(900, 300)));
    assert!((p.camera().aspect - 3.0).abs() < 1e-5);
}
