//! Foundation elements for Mosaic widgets: mutator arbitration and drag state.

pub mod draggable;
pub mod mutator;


pub use draggable::{DragScope, DraggableState};
pub use mutator::{
    Acquisition, ArbiterError, ArbiterState, DragArbiter, MutatePriority, MutatorToken,
    TokenStatus,
};

pub mod prelude {
    pub use crate::draggable::*;
    pub use crate::mutator::*;
}
