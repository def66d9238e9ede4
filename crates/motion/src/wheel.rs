use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::{EventKind, InputBus, InputEvent, ListenerId};

/// Accumulates raw wheel deltas into a session-long running total.
///
/// The total is never clamped, decayed, or reset; scaling to shader-space
/// units happens at the sampling boundary, keeping the accumulator
/// unit-agnostic. Stored as f64 so marathon scroll sessions cannot lose
/// precision.
pub struct WheelTracker {
    total: Rc<RefCell<f64>>,
    listener: Option<ListenerId>,
}

impl WheelTracker {
    pub fn new() -> Self {
        Self {
            total: Rc::new(RefCell::new(0.0)),
            listener: None,
        }
    }

    pub fn activate(&mut self, bus: &mut InputBus) {
        self.deactivate(bus);

        let total = Rc::clone(&self.total);
        let id = bus.attach(
            EventKind::Wheel,
            Box::new(move |event| {
                if let InputEvent::Wheel { delta_y } = event {
                    *total.borrow_mut() += delta_y;
                }
            }),
        );
        self.listener = Some(id);
    }

    /// Detaches the wheel listener; idempotent.
    pub fn deactivate(&mut self, bus: &mut InputBus) {
        if let Some(id) = self.listener.take() {
            bus.detach(id);
        }
    }

    /// Current cumulative scroll distance.
    pub fn total(&self) -> f64 {
        *self.total.borrow()
    }
}

impl Default for WheelTracker {
    fn default() -> Self {
        Self::new()
    }
}
