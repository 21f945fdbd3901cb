//! HTTP API module for the payroll engine.
//!
//! This module provides the REST endpoints for payroll previews, policy
//! lookup and validation, cutoff windows, payroll generation and payslips.
//! Every request carries a [`SessionContext`] taken from its headers.

mod handlers;
mod request;
mod response;
mod session;
mod state;

pub use handlers::create_router;
pub use request::{
    BatchRequest, CutoffQuery, GenerateRequest, PayslipPeriod, PreviewRequest, PreviewRow,
    SendPayslipsRequest, ValidatePolicyRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, BatchResponse, CutoffResponse, GenerateResponse, HealthResponse,
    PayslipResponse, PolicyResponse, PreviewResponse, SendPayslipsResponse,
};
pub use session::{PLAN_HEADER, ROLE_HEADER, SessionContext, SubscriptionPlan, UserRole};
pub use state::AppState;
