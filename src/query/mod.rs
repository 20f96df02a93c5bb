//! Query building: form state, validation and the query model.

mod assembler;
pub mod form;
mod model;

pub use assembler::*;
pub use form::{FormState, GroupByKind, SectionId};
pub use model::*;
