//! Per-request session context.
//!
//! The caller's subscription plan and role arrive as request headers and are
//! extracted into a [`SessionContext`] for each handler. Missing headers fall
//! back to the Basic plan and the Owner role.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};

use super::response::{ApiError, ApiErrorResponse};
use crate::error::{EngineError, EngineResult};

/// Header carrying the subscription plan.
pub const PLAN_HEADER: &str = "x-subscription-plan";
/// Header carrying the user role.
pub const ROLE_HEADER: &str = "x-user-role";

/// Subscription plan of the calling organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    /// Entry plan.
    #[default]
    Basic,
    /// Mid tier.
    Pro,
    /// Includes payroll computation.
    Enterprise,
}

impl FromStr for SubscriptionPlan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BASIC" => Ok(Self::Basic),
            "PRO" => Ok(Self::Pro),
            "ENTERPRISE" => Ok(Self::Enterprise),
            other => Err(format!("unknown subscription plan '{}'", other)),
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "BASIC",
            Self::Pro => "PRO",
            Self::Enterprise => "ENTERPRISE",
        })
    }
}

/// Role of the calling user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Account owner.
    #[default]
    Owner,
    /// Administrator.
    Admin,
    /// Regular employee.
    Employee,
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "OWNER" => Ok(Self::Owner),
            "ADMIN" => Ok(Self::Admin),
            "EMPLOYEE" => Ok(Self::Employee),
            other => Err(format!("unknown user role '{}'", other)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Owner => "OWNER",
            Self::Admin => "ADMIN",
            Self::Employee => "EMPLOYEE",
        })
    }
}

/// The plan and role a request runs under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Subscription plan.
    pub plan: SubscriptionPlan,
    /// User role.
    pub role: UserRole,
}

impl SessionContext {
    /// Owners and admins may run and change payroll.
    pub fn can_manage_payroll(&self) -> bool {
        matches!(self.role, UserRole::Owner | UserRole::Admin)
    }

    /// Payroll computation is an Enterprise feature.
    pub fn has_payroll_computation(&self) -> bool {
        self.plan == SubscriptionPlan::Enterprise
    }

    /// Fails with [`EngineError::Forbidden`] unless the role may manage payroll.
    pub fn require_payroll_manager(&self) -> EngineResult<()> {
        if self.can_manage_payroll() {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                message: format!("role {} cannot manage payroll", self.role),
            })
        }
    }

    /// Fails with [`EngineError::Forbidden`] unless the plan includes payroll computation.
    pub fn require_payroll_computation(&self) -> EngineResult<()> {
        if self.has_payroll_computation() {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                message: format!(
                    "payroll computation is only available on the ENTERPRISE plan (current plan: {})",
                    self.plan
                ),
            })
        }
    }
}

fn header_value<T>(parts: &Parts, name: &str) -> Result<Option<T>, ApiErrorResponse>
where
    T: FromStr<Err = String>,
{
    let Some(raw) = parts.headers.get(name) else {
        return Ok(None);
    };
    let invalid = |message: String| {
        ApiErrorResponse::new(
            axum::http::StatusCode::BAD_REQUEST,
            ApiError::with_details("INVALID_SESSION", format!("Invalid {} header", name), message),
        )
    };

    let text = raw
        .to_str()
        .map_err(|_| invalid("header is not valid ASCII".to_string()))?;
    if text.trim().is_empty() {
        return Ok(None);
    }
    text.parse::<T>().map(Some).map_err(invalid)
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            plan: header_value(parts, PLAN_HEADER)?.unwrap_or_default(),
            role: header_value(parts, ROLE_HEADER)?.unwrap_or_default(),
        })
    }
}
