//! Organization models: businesses, branches and positions.

use serde::{Deserialize, Serialize};

/// Identifier of a business (tenant).
pub type BusinessId = u64;
/// Identifier of a branch.
pub type BranchId = u64;
/// Identifier of a job position.
pub type PositionId = u64;
/// Identifier of an employee.
pub type EmployeeId = u64;
/// Identifier of a salary component.
pub type ComponentId = u64;
/// Identifier of a payroll cycle.
pub type CycleId = u64;
/// Identifier of a payroll policy.
pub type PolicyId = u64;

/// A top-level tenant owning branches, employees and a payroll policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    /// Unique identifier for the business.
    pub id: BusinessId,
    /// Display name of the business.
    pub name: String,
}

/// A physical or organizational subdivision of a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Unique identifier for the branch.
    pub id: BranchId,
    /// The owning business.
    #[serde(rename = "business")]
    pub business_id: BusinessId,
    /// Display name of the branch.
    pub name: String,
}

/// A job position that salary structures attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier for the position.
    pub id: PositionId,
    /// Position title.
    pub name: String,
}
