use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::core::ViewState;

/// View state held by a parent container.
///
/// The render surface only reads it and proposes replacements; whether a
/// proposal is accepted, clamped or dropped is up to the owner.
pub trait ExternalViewState {
    fn get(&self) -> ViewState;
    fn propose(&mut self, next: ViewState);
}

pub type ViewStateListener = Box<dyn FnMut(ViewState)>;

/// Who writes the view state of one render surface.
///
/// Exactly one writer exists: the surface itself (`Internal`) or the
/// external owner (`External`).
pub enum ViewStateSource {
    Internal {
        cell: ViewState,
        listener: Option<ViewStateListener>,
    },
    External(Box<dyn ExternalViewState>),
}

impl fmt::Debug for ViewStateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Internal { cell, listener } => f
                .debug_struct("Internal")
                .field("cell", cell)
                .field("has_listener", &listener.is_some())
                .finish(),
            Self::External(owner) => f.debug_tuple("External").field(&owner.get()).finish(),
        }
    }
}

impl Default for ViewStateSource {
    fn default() -> Self {
        Self::internal(ViewState::default())
    }
}

impl ViewStateSource {
    #[must_use]
    pub fn internal(initial: ViewState) -> Self {
        Self::Internal {
            cell: initial,
            listener: None,
        }
    }

    #[must_use]
    pub fn external(owner: impl ExternalViewState + 'static) -> Self {
        Self::External(Box::new(owner))
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self, Self::External(_))
    }

    #[must_use]
    pub fn current(&self) -> ViewState {
        match self {
            Self::Internal { cell, .. } => *cell,
            Self::External(owner) => owner.get(),
        }
    }

    /// Internal state is replaced and the listener notified; external state
    /// only receives a proposal.
    pub fn commit(&mut self, next: ViewState) {
        match self {
            Self::Internal { cell, listener } => {
                *cell = next;
                if let Some(listener) = listener.as_mut() {
                    listener(next);
                }
            }
            Self::External(owner) => owner.propose(next),
        }
    }

    #[must_use]
    pub fn has_listener(&self) -> bool {
        matches!(self, Self::Internal { listener: Some(_), .. })
    }

    /// Installs a change listener and returns whether it was kept.
    ///
    /// Controlled sources drop it: the owner already receives every proposal.
    pub fn set_listener(&mut self, new_listener: ViewStateListener) -> bool {
        match self {
            Self::Internal { listener, .. } => {
                *listener = Some(new_listener);
                true
            }
            Self::External(_) => {
                debug!("view state listener ignored in controlled mode");
                false
            }
        }
    }
}

/// Shared, single-threaded view-state container with set/reset.
///
/// Clones share the same cell, so a parent can keep one handle and give
/// another to a render surface as its external owner.
#[derive(Debug, Clone, Default)]
pub struct SharedViewStore {
    cell: Rc<RefCell<ViewState>>,
}

impl SharedViewStore {
    #[must_use]
    pub fn new(initial: ViewState) -> Self {
        Self {
            cell: Rc::new(RefCell::new(initial)),
        }
    }

    #[must_use]
    pub fn view_state(&self) -> ViewState {
        *self.cell.borrow()
    }

    pub fn set_view_state(&self, next: ViewState) {
        *self.cell.borrow_mut() = next;
    }

    /// Replaces the state wholesale with the default view.
    pub fn reset(&self) {
        self.set_view_state(ViewState::default());
    }
}

impl ExternalViewState for SharedViewStore {
    fn get(&self) -> ViewState {
        self.view_state()
    }

    fn propose(&mut self, next: ViewState) {
        self.set_view_state(next);
    }
}

/// External owner built from a getter and a proposal callback.
pub struct CallbackViewState<G, P> {
    get: G,
    propose: P,
}

impl<G, P> CallbackViewState<G, P>
where
    G: Fn() -> ViewState,
    P: FnMut(ViewState),
{
    pub fn new(get: G, propose: P) -> Self {
        Self { get, propose }
    }
}

impl<G, P> ExternalViewState for CallbackViewState<G, P>
where
    G: Fn() -> ViewState,
    P: FnMut(ViewState),
{
    fn get(&self) -> ViewState {
        (self.get)()
    }

    fn propose(&mut self, next: ViewState) {
        (self.propose)(next);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::{CallbackViewState, SharedViewStore, ViewStateSource};
    use crate::core::ViewState;

    #[test]
    fn internal_commit_updates_cell_and_notifies_listener() {
        let seen = Rc::new(Cell::new(None));
        let mut source = ViewStateSource::internal(ViewState::default());
        let sink = Rc::clone(&seen);
        assert!(source.set_listener(Box::new(move |next| sink.set(Some(next)))));
        assert!(source.has_listener());

        let next = ViewState::new(2.0, 5.0, 0.0);
        source.commit(next);
        assert_eq!(source.current(), next);
        assert_eq!(seen.get(), Some(next));
    }

    #[test]
    fn external_owner_may_reject_proposals() {
        let fixed = ViewState::new(3.0, 0.0, 0.0);
        let proposals = Rc::new(Cell::new(0));
        let counter = Rc::clone(&proposals);
        let mut source = ViewStateSource::external(CallbackViewState::new(
            move || fixed,
            move |_| counter.set(counter.get() + 1),
        ));

        source.commit(ViewState::new(9.0, 1.0, 1.0));
        assert!(source.is_controlled());
        assert_eq!(source.current(), fixed);
        assert_eq!(proposals.get(), 1);
        assert!(!source.set_listener(Box::new(|_| {})));
        assert!(!source.has_listener());
    }

    #[test]
    fn shared_store_clones_share_state() {
        let store = SharedViewStore::new(ViewState::new(4.0, 1.0, 2.0));
        let handle = store.clone();
        handle.set_view_state(ViewState::new(5.0, 0.0, 0.0));
        assert_eq!(store.view_state().scale, 5.0);
        store.reset();
        assert_eq!(handle.view_state(), ViewState::default());
    }
}
