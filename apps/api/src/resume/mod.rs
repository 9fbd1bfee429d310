// Resume editing core: bounded undo/redo history and the facade that pairs it
// with debounced persistence.

pub mod facade;
pub mod handlers;
pub mod history;

pub use facade::{ProviderOptions, ResumeContext, ResumeError, ResumeFacade, ResumeSnapshot};
