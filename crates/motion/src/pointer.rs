use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::{EventKind, InputBus, InputEvent, ListenerId};

/// Displacement from the press origin to the current pointer position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragDelta {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Default)]
struct DragState {
    pointer_down: bool,
    origin_x: f64,
    origin_y: f64,
    delta: DragDelta,
}

impl DragState {
    fn on_press(&mut self, x: f64, y: f64) {
        self.pointer_down = true;
        self.origin_x = x;
        self.origin_y = y;
    }

    fn on_move(&mut self, x: f64, y: f64) {
        if !self.pointer_down {
            return;
        }
        // Absolute offset from the press origin, never an incremental step,
        // so dropped move events cannot accumulate drift.
        self.delta = DragDelta {
            x: x - self.origin_x,
            y: y - self.origin_y,
        };
    }

    fn on_release(&mut self) {
        if !self.pointer_down {
            return;
        }
        self.pointer_down = false;
        self.delta = DragDelta::default();
    }
}

/// Tracks the current drag gesture via bus listeners.
///
/// Move events outside a press are ignored, and the delta resets to zero on
/// release: each drag is an independent, bounded interaction whose motion the
/// frame sampler has already integrated by the time the button comes back up.
pub struct PointerTracker {
    state: Rc<RefCell<DragState>>,
    listeners: Option<[ListenerId; 3]>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(DragState::default())),
            listeners: None,
        }
    }

    pub fn activate(&mut self, bus: &mut InputBus) {
        self.deactivate(bus);

        let state = Rc::clone(&self.state);
        let down = bus.attach(
            EventKind::PointerDown,
            Box::new(move |event| {
                if let InputEvent::PointerDown { x, y } = event {
                    state.borrow_mut().on_press(*x, *y);
                }
            }),
        );

        let state = Rc::clone(&self.state);
        let moved = bus.attach(
            EventKind::PointerMove,
            Box::new(move |event| {
                if let InputEvent::PointerMove { x, y } = event {
                    state.borrow_mut().on_move(*x, *y);
                }
            }),
        );

        let state = Rc::clone(&self.state);
        let up = bus.attach(
            EventKind::PointerUp,
            Box::new(move |_| state.borrow_mut().on_release()),
        );

        self.listeners = Some([down, moved, up]);
    }

    /// Detaches all three listeners; idempotent.
    pub fn deactivate(&mut self, bus: &mut InputBus) {
        if let Some(listeners) = self.listeners.take() {
            for id in listeners {
                bus.detach(id);
            }
        }
    }

    /// Snapshot of the current drag displacement.
    pub fn delta(&self) -> DragDelta {
        self.state.borrow().delta
    }

    pub fn is_down(&self) -> bool {
        self.state.borrow().pointer_down
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}
