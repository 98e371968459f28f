//! Response bodies returned by the handlers.

mod analysis;
mod error_response;
mod monitors;

pub use analysis::{
    AnalyzeResponse, SCHEMA_ISSUES_HEADER, UPSTREAM_ERROR_MESSAGE, UnparseableAnalysis,
    UpstreamFailure,
};
pub use error_response::ErrorResponse;
pub use monitors::HealthResponse;
