//! REST backend client.
//!
//! Reads go to the backend's `/payroll/api/` routes with
//! `Authorization: Token <token>`. List endpoints may answer with a bare
//! JSON array or a paginated `{ "results": [...] }` envelope; both are
//! accepted.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::DataSource;
use crate::config::BackendConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Branch, BranchId, Business, BusinessId, CycleType, Employee, EmployeeId,
    Holiday, PayrollCycle, PayrollPolicy, Position, SalaryComponent, SalaryRate, SalaryStructure,
    WorkSchedule,
};

const SOURCE_NAME: &str = "remote";
const API_PREFIX: &str = "/payroll/api";

/// Body of a payslip email request.
///
/// The backend renders and sends the payslip itself; this crate only
/// triggers it. Single sends need `employee_id`; bulk sends need
/// `business_id` or `branch_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PayslipEmailRequest {
    /// The employee for a single send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<EmployeeId>,
    /// Every employee of the business, for a bulk send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_id: Option<BusinessId>,
    /// Every employee of the branch, for a bulk send.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    /// First day of the payroll month.
    pub month: NaiveDate,
    /// The cycle the payslip covers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payroll_cycle: Option<CycleType>,
    /// Human-readable period label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Business name printed on the payslip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

/// Per-employee outcome of a bulk payslip send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDispatch {
    /// The employee.
    pub employee_id: EmployeeId,
    /// Whether the email went out.
    pub success: bool,
    /// Provider message id on success.
    #[serde(default)]
    pub message_id: Option<String>,
    /// Failure reason.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Plain(Vec<T>),
    Paged {
        results: Vec<T>,
        #[serde(default)]
        next: Option<String>,
    },
}

impl<T> ListResponse<T> {
    /// The items of this page and the URL of the next one.
    fn into_page(self) -> (Vec<T>, Option<String>) {
        match self {
            ListResponse::Plain(items) => (items, None),
            ListResponse::Paged { results, next } => (results, next),
        }
    }
}

/// Upper bound on pages read from one list endpoint.
const MAX_PAGES: usize = 1000;

/// [`DataSource`] backed by the payroll REST API.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteSource {
    /// Builds a client with the configured timeout.
    pub fn new(config: &BackendConfig) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, API_PREFIX, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Token {}", token)),
            None => request,
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> EngineResult<Vec<T>> {
        let url = self.url(path);
        debug!(url = %url, "Fetching from payroll backend");

        let mut request = self.client.get(&url).query(query);
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let response = self
                .authorized(request)
                .send()
                .await
                .map_err(|e| unavailable(format!("GET {} failed: {}", path, e)))?;

            let body: ListResponse<T> = checked(path, response)
                .await?
                .json()
                .await
                .map_err(|e| unavailable(format!("failed to parse {} response: {}", path, e)))?;

            let (results, next) = body.into_page();
            items.extend(results);
            match next {
                Some(next) => {
                    debug!(url = %next, page = page + 1, "Fetching next page");
                    // The next link already carries the query string
                    request = self.client.get(next);
                }
                None => return Ok(items),
            }
        }

        Err(unavailable(format!(
            "{} returned more than {} pages",
            path, MAX_PAGES
        )))
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> EngineResult<Response> {
        let response = self
            .authorized(self.client.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(|e| unavailable(format!("POST {} failed: {}", path, e)))?;

        checked(path, response).await
    }

    /// Asks the backend to email one employee's payslip.
    pub async fn send_single_payslip(&self, request: &PayslipEmailRequest) -> EngineResult<()> {
        if request.employee_id.is_none() {
            return Err(EngineError::InvalidInput {
                field: "employee_id".to_string(),
                message: "is required for a single payslip email".to_string(),
            });
        }

        self.post("email/send-single-payslip/", request).await?;
        Ok(())
    }

    /// Asks the backend to email payslips to every employee of a business or branch.
    pub async fn send_bulk_payslips(
        &self,
        request: &PayslipEmailRequest,
    ) -> EngineResult<Vec<EmailDispatch>> {
        if request.business_id.is_none() && request.branch_id.is_none() {
            return Err(EngineError::InvalidInput {
                field: "business_id".to_string(),
                message: "either business_id or branch_id is required".to_string(),
            });
        }

        self.post("email/send-bulk-payslip/", request)
            .await?
            .json()
            .await
            .map_err(|e| unavailable(format!("failed to parse bulk email response: {}", e)))
    }
}

async fn checked(path: &str, response: Response) -> EngineResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(unavailable(format!("{} returned {}: {}", path, status, body)))
}

fn unavailable(message: String) -> EngineError {
    EngineError::SourceUnavailable {
        source_name: SOURCE_NAME.to_string(),
        message,
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn businesses(&self) -> EngineResult<Vec<Business>> {
        self.list("businesses/", &[]).await
    }

    async fn branches(&self) -> EngineResult<Vec<Branch>> {
        self.list("branches/", &[]).await
    }

    async fn positions(&self) -> EngineResult<Vec<Position>> {
        self.list("positions/", &[]).await
    }

    async fn employees(&self) -> EngineResult<Vec<Employee>> {
        self.list("employees/", &[]).await
    }

    async fn policies(&self) -> EngineResult<Vec<PayrollPolicy>> {
        self.list("policies/", &[]).await
    }

    async fn holidays(&self) -> EngineResult<Vec<Holiday>> {
        self.list("holidays/", &[]).await
    }

    async fn components(&self) -> EngineResult<Vec<SalaryComponent>> {
        self.list("components/", &[]).await
    }

    async fn structures(&self) -> EngineResult<Vec<SalaryStructure>> {
        self.list("structure/", &[]).await
    }

    async fn cycles(&self) -> EngineResult<Vec<PayrollCycle>> {
        self.list("cycles/", &[]).await
    }

    async fn salary_rates(&self) -> EngineResult<Vec<SalaryRate>> {
        self.list("salary-rates/", &[]).await
    }

    async fn schedules(&self) -> EngineResult<Vec<WorkSchedule>> {
        self.list("work-schedules/", &[]).await
    }

    async fn attendance(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let records: Vec<AttendanceRecord> = self
            .list(
                "timekeeping/",
                &[("start", start.to_string()), ("end", end.to_string())],
            )
            .await?;

        // Older backends ignore the range parameters.
        Ok(records
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect())
    }
}
