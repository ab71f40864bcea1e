//! Frame clock and timeline preview.
//!
//! [`DrawTimer`] does not own a thread or a timer. The host calls [`DrawTimer::tick`]
//! every [`DrawTimer::interval`]; while started it dispatches `DRAW` then `STEP`.
//! [`Previewer`] listens for `STEP` and walks the model's cursor to the last frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use log::{debug, warn};
use spranim_events_core::OwnerId;

use crate::config::KEYFRAMES;
use crate::events::{draw_timer, previewer, EditorBus, EventPayload};
use crate::frame_model::FrameModel;

pub struct DrawTimer {
    bus: EditorBus,
    owner: OwnerId,
    fps: u32,
    running: Rc<Cell<bool>>,
}

impl DrawTimer {
    /// Subscribes to `drawtimer-start` / `drawtimer-stop` on `bus`.
    pub fn new(bus: &EditorBus, fps: u32) -> Self {
        let owner = bus.new_owner();
        let running = Rc::new(Cell::new(false));

        let flag = Rc::clone(&running);
        bus.on(draw_timer::START, owner, move |_, _| flag.set(true));
        let flag = Rc::clone(&running);
        bus.on(draw_timer::STOP, owner, move |_, _| flag.set(false));

        Self {
            bus: bus.clone(),
            owner,
            fps: fps.max(1),
            running,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps))
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn start(&self) {
        self.bus.dispatch(draw_timer::START, &EventPayload::None);
    }

    pub fn stop(&self) {
        self.bus.dispatch(draw_timer::STOP, &EventPayload::None);
    }

    /// Returns whether anything was dispatched.
    pub fn tick(&self) -> bool {
        if !self.running.get() {
            return false;
        }
        self.bus.dispatch(draw_timer::DRAW, &EventPayload::None);
        self.bus.dispatch(draw_timer::STEP, &EventPayload::None);
        true
    }
}

impl Drop for DrawTimer {
    fn drop(&mut self) {
        self.bus.forget_owner(self.owner);
    }
}

/// Advances the cursor one frame per `STEP`. On reaching the last frame it detaches and
/// dispatches `previewer-stop`.
pub struct Previewer {
    shared: Rc<PreviewState>,
}

struct PreviewState {
    model: Rc<RefCell<FrameModel>>,
    bus: EditorBus,
    owner: OwnerId,
    running: Cell<bool>,
}

impl Previewer {
    pub fn new(model: Rc<RefCell<FrameModel>>) -> Self {
        let bus = model.borrow().bus().clone();
        let owner = bus.new_owner();
        Self {
            shared: Rc::new(PreviewState {
                model,
                bus,
                owner,
                running: Cell::new(false),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// No-op while already running.
    pub fn start(&self) {
        if self.shared.running.replace(true) {
            return;
        }
        let state = Rc::downgrade(&self.shared);
        self.shared.bus.on(draw_timer::STEP, self.shared.owner, move |_, _| {
            if let Some(state) = state.upgrade() {
                state.step();
            }
        });
        debug!("preview started");
    }

    pub fn stop(&self) {
        self.shared.stop();
    }
}

impl PreviewState {
    fn step(&self) {
        let reached_end = {
            let Ok(mut model) = self.model.try_borrow_mut() else {
                warn!("preview step skipped: frame model is borrowed");
                return;
            };
            let next = model.current_frame_index() + 1;
            model.set_current_frame(next);
            model.current_frame_index() == KEYFRAMES - 1
        };
        if reached_end {
            self.stop();
        }
    }

    fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        self.bus.off(draw_timer::STEP, self.owner);
        debug!("preview stopped");
        self.bus.dispatch(previewer::STOP, &EventPayload::None);
    }
}

impl Drop for Previewer {
    fn drop(&mut self) {
        self.shared.bus.forget_owner(self.shared.owner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn timer_only_ticks_while_started() {
        let bus = EditorBus::new();
        let timer = DrawTimer::new(&bus, 16);
        assert_eq!(timer.interval(), Duration::from_secs_f64(1.0 / 16.0));
        assert!(!timer.tick());
        timer.start();
        assert!(timer.tick());
        timer.stop();
        assert!(!timer.tick());
    }

    #[test]
    fn preview_runs_to_the_last_frame_and_stops() {
        let bus = EditorBus::new();
        let model = Rc::new(RefCell::new(FrameModel::new(Config::default(), bus.clone())));
        let timer = DrawTimer::new(&bus, 16);
        let preview = Previewer::new(Rc::clone(&model));

        let stops = Rc::new(Cell::new(0));
        let s = Rc::clone(&stops);
        bus.on(previewer::STOP, bus.new_owner(), move |_, _| s.set(s.get() + 1));

        timer.start();
        preview.start();
        preview.start();
        let mut ticks = 0;
        while preview.is_running() && ticks < 200 {
            timer.tick();
            ticks += 1;
        }
        assert_eq!(ticks, KEYFRAMES - 1);
        assert_eq!(model.borrow().current_frame_index(), KEYFRAMES - 1);
        assert_eq!(stops.get(), 1);

        timer.tick();
        assert_eq!(model.borrow().current_frame_index(), KEYFRAMES - 1);
        assert_eq!(stops.get(), 1);
    }
}
