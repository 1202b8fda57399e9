//! Traits at the pipeline's external seams.

mod completion;

pub use completion::Completion;
