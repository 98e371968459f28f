//! Request bodies accepted by the handlers.

mod analyze;

pub use analyze::AnalyzeRequest;
