use std::cell::Cell;
use std::rc::Rc;

use crate::core::LogicalSize;

/// Platform capability that reports content-box size changes of a host
/// element.
///
/// Observers are polled from the UI thread; `take_size` returns the latest
/// size reported since the previous call.
pub trait SizeObserver {
    fn take_size(&mut self) -> Option<LogicalSize>;

    /// Stops observation. Called exactly once by [`ObserverGuard`].
    fn disconnect(&mut self);
}

/// Owns an observer and disconnects it when the owning surface is torn down.
#[derive(Debug)]
pub struct ObserverGuard<O: SizeObserver> {
    observer: O,
}

impl<O: SizeObserver> ObserverGuard<O> {
    pub fn new(observer: O) -> Self {
        Self { observer }
    }

    pub fn take_size(&mut self) -> Option<LogicalSize> {
        self.observer.take_size()
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }
}

impl<O: SizeObserver> Drop for ObserverGuard<O> {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[derive(Debug, Default)]
struct ManualSizeState {
    pending: Cell<Option<LogicalSize>>,
    disconnected: Cell<bool>,
}

/// Observer driven by explicit triggers, for headless hosts, tests, and
/// adapters that receive resize callbacks from their toolkit.
#[derive(Debug, Clone, Default)]
pub struct ManualSizeObserver {
    state: Rc<ManualSizeState>,
}

impl ManualSizeObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle used to report new sizes into this observer.
    #[must_use]
    pub fn trigger(&self) -> ResizeTrigger {
        ResizeTrigger {
            state: Rc::clone(&self.state),
        }
    }
}

impl SizeObserver for ManualSizeObserver {
    fn take_size(&mut self) -> Option<LogicalSize> {
        self.state.pending.take()
    }

    fn disconnect(&mut self) {
        self.state.disconnected.set(true);
        self.state.pending.set(None);
    }
}

/// Reports sizes to a [`ManualSizeObserver`]; reports after disconnect are
/// dropped.
#[derive(Debug, Clone)]
pub struct ResizeTrigger {
    state: Rc<ManualSizeState>,
}

impl ResizeTrigger {
    pub fn resize(&self, width: f64, height: f64) {
        if !self.state.disconnected.get() {
            self.state.pending.set(Some(LogicalSize::new(width, height)));
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.state.disconnected.get()
    }
}

#[cfg(test)]
mod tests {
    use super::{ManualSizeObserver, ObserverGuard, SizeObserver};
    use crate::core::LogicalSize;

    #[test]
    fn latest_size_wins_and_is_taken_once() {
        let mut observer = ManualSizeObserver::new();
        let trigger = observer.trigger();
        trigger.resize(100.0, 50.0);
        trigger.resize(120.0, 60.0);
        assert_eq!(observer.take_size(), Some(LogicalSize::new(120.0, 60.0)));
        assert_eq!(observer.take_size(), None);
    }

    #[test]
    fn dropping_guard_disconnects() {
        let observer = ManualSizeObserver::new();
        let trigger = observer.trigger();
        drop(ObserverGuard::new(observer));
        assert!(!trigger.is_connected());
        trigger.resize(10.0, 10.0);
    }
}
