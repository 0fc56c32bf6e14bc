use crate::frame::Frame;

/// An event tagged with the frame that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<K> {
    pub frame_index: u64,
    pub kind: K,
}

/// Append-only event log drained by the host once per frame.
///
/// The host turns these into side effects the core does not own, such as
/// playing a sound when a bridge segment lands.
#[derive(Debug)]
pub struct EventBus<K> {
    events: Vec<Event<K>>,
}

impl<K> Default for EventBus<K> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<K> EventBus<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, frame: Frame, kind: K) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
        });
    }

    pub fn extend(&mut self, frame: Frame, kinds: impl IntoIterator<Item = K>) {
        for kind in kinds {
            self.emit(frame, kind);
        }
    }

    pub fn events(&self) -> &[Event<K>] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event<K>> {
        std::mem::take(&mut self.events)
    }
}
