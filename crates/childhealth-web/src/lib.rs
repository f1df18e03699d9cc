//! childhealth-web: ChildHealth AI web server.
//! Provides:
//!   - Health questionnaire and prediction
//!   - Ranked results with chart and risk summary
//!   - Pediatric provider search
//!   - Document-grounded chat assistant
//!   - JSON API mirroring every page

pub mod router;
pub mod handlers;
pub mod state;
pub mod session;
pub mod sse;
pub mod templates;
