use winit::keyboard::KeyCode;

/// Raw input events as delivered by the host event loop.
///
/// The bus is deliberately ignorant of `winit` window plumbing; the host
/// translates whatever its platform delivers into these variants and pumps
/// them through [`InputBus::dispatch`]. Pointer coordinates are in physical
/// pixels with the origin at the top-left of the drawable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { delta_y: f64 },
}

/// Discriminant used to address listener registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::KeyDown(_) => EventKind::KeyDown,
            InputEvent::KeyUp(_) => EventKind::KeyUp,
            InputEvent::PointerDown { .. } => EventKind::PointerDown,
            InputEvent::PointerMove { .. } => EventKind::PointerMove,
            InputEvent::PointerUp => EventKind::PointerUp,
            InputEvent::Wheel { .. } => EventKind::Wheel,
        }
    }
}

/// Handle returned by [`InputBus::attach`]; detaching an id that was already
/// removed is a no-op, which keeps tracker teardown idempotent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&InputEvent)>;

/// Single-threaded listener registry standing in for the platform's global
/// input source.
///
/// Trackers attach one callback per event kind they care about and detach
/// them on deactivation, so a torn-down tracker can never observe events
/// again. Listeners fire in attach order. The bus is `!Send` on purpose:
/// input dispatch and frame sampling share one thread, which is what lets
/// the trackers go lock-free.
#[derive(Default)]
pub struct InputBus {
    next_id: u64,
    listeners: Vec<(ListenerId, EventKind, Callback)>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one event kind and returns its handle.
    pub fn attach(&mut self, kind: EventKind, callback: Callback) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, callback));
        id
    }

    /// Removes a previously attached listener. Unknown ids are ignored.
    pub fn detach(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener, _, _)| *listener != id);
    }

    /// Delivers one event to every listener registered for its kind.
    pub fn dispatch(&mut self, event: &InputEvent) {
        let kind = event.kind();
        for (_, listener_kind, callback) in &mut self.listeners {
            if *listener_kind == kind {
                callback(event);
            }
        }
    }

    /// Number of listeners currently attached for the given kind.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|(_, listener_kind, _)| *listener_kind == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn dispatch_reaches_only_matching_listeners() {
        let mut bus = InputBus::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let wheel_hits = Rc::clone(&hits);
        bus.attach(
            EventKind::Wheel,
            Box::new(move |event| {
                if let InputEvent::Wheel { delta_y } = event {
                    wheel_hits.borrow_mut().push(*delta_y);
                }
            }),
        );
        let up_hits = Rc::clone(&hits);
        bus.attach(
            EventKind::PointerUp,
            Box::new(move |_| up_hits.borrow_mut().push(-1.0)),
        );

        bus.dispatch(&InputEvent::Wheel { delta_y: 12.0 });
        bus.dispatch(&InputEvent::PointerMove { x: 4.0, y: 5.0 });

        assert_eq!(*hits.borrow(), vec![12.0]);
    }

    #[test]
    fn detach_removes_exactly_one_listener() {
        let mut bus = InputBus::new();
        let first = bus.attach(EventKind::Wheel, Box::new(|_| {}));
        bus.attach(EventKind::Wheel, Box::new(|_| {}));
        assert_eq!(bus.listener_count(EventKind::Wheel), 2);

        bus.detach(first);
        assert_eq!(bus.listener_count(EventKind::Wheel), 1);

        // Detaching the same handle again changes nothing.
        bus.detach(first);
        assert_eq!(bus.listener_count(EventKind::Wheel), 1);
    }

    #[test]
    fn listeners_fire_in_attach_order() {
        let mut bus = InputBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            bus.attach(
                EventKind::PointerUp,
                Box::new(move |_| order.borrow_mut().push(tag)),
            );
        }

        bus.dispatch(&InputEvent::PointerUp);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }
}
