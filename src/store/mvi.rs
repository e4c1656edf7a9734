//! Unidirectional data-flow primitives for the catalogue store.
//!
//! ```text
//! Action ──→ ApiClient ──→ Mutation ──→ Reducer ──→ State ──→ subscribers
//! ```
//!
//! Actions may do I/O; reducers may not. State only ever changes by feeding a
//! mutation through a reducer.

/// Marker trait for state held by a store.
///
/// States are cloned out to readers, compared to skip redundant
/// notifications, and start from `Default`.
pub trait StoreState: Clone + PartialEq + Default + Send + Sync + 'static {}

/// Marker trait for the messages a reducer accepts.
pub trait Intent: Send + 'static {}

/// Pure state transition: `(State, Intent) -> State`.
pub trait Reducer {
    type State: StoreState;
    type Intent: Intent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
