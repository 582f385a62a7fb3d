pub mod events;
pub mod gestures;

// Re-export the essential types
pub use events::{GestureEvent, GestureKind, GesturePhase};
pub use gestures::{
    GestureConfig, GestureCoordinator, GestureResponse, GestureState, SimultaneityPolicy,
};
