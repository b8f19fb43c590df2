//! Notification hooks the UI subscribes to

/// Events emitted by document mutators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// The committed selection changed
    SelectionChanged,
    /// The selection became empty
    SelectionCleared,
    /// Transient human-readable message for the status bar
    Status(String),
}

type Listener = Box<dyn FnMut(&DocumentEvent)>;

/// Listener registry with an explicit mute switch
///
/// Muting is how a caller updates document state without triggering its own
/// change handler (a UI syncing a combo box, for instance) instead of
/// juggling a shared reentrancy flag.
#[derive(Default)]
pub struct EventHub {
    listeners: Vec<Listener>,
    muted: bool,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for all document events
    pub fn subscribe(&mut self, listener: impl FnMut(&DocumentEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Deliver `event` to every listener, unless muted
    pub fn emit(&mut self, event: DocumentEvent) {
        if self.muted {
            return;
        }
        for listener in &mut self.listeners {
            listener(&event);
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.listeners.len())
            .field("muted", &self.muted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_reaches_all_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();
        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |e| seen.borrow_mut().push(e.clone()));
        }
        hub.emit(DocumentEvent::SelectionChanged);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_muted_hub_drops_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub = EventHub::new();
        {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |e| seen.borrow_mut().push(e.clone()));
        }
        hub.set_muted(true);
        hub.emit(DocumentEvent::SelectionCleared);
        assert!(seen.borrow().is_empty());
        hub.set_muted(false);
        hub.emit(DocumentEvent::SelectionCleared);
        assert_eq!(seen.borrow().len(), 1);
    }
}
