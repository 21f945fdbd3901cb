//! Source selection with graceful degradation.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::{DataOrigin, DataSource, Sourced, SourcePolicy};
use crate::config::PayrollDataset;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditWarning, Employee, PayrollCycle, PayrollPolicy};

/// Warning code attached to data served from the fallback source.
pub const FALLBACK_WARNING_CODE: &str = "FALLBACK_DATA";

/// Routes reads to the remote or fallback source according to a [`SourcePolicy`].
#[derive(Clone)]
pub struct DataGateway {
    policy: SourcePolicy,
    remote: Option<Arc<dyn DataSource>>,
    fallback: Arc<dyn DataSource>,
}

impl DataGateway {
    /// Creates a gateway.
    ///
    /// Fails with a configuration error when the policy reads from the
    /// remote source but none is given.
    pub fn new(
        policy: SourcePolicy,
        remote: Option<Arc<dyn DataSource>>,
        fallback: Arc<dyn DataSource>,
    ) -> EngineResult<Self> {
        if policy != SourcePolicy::Fallback && remote.is_none() {
            return Err(EngineError::Configuration {
                message: format!("source policy {} requires a remote source", policy),
            });
        }

        Ok(Self {
            policy,
            remote,
            fallback,
        })
    }

    /// A gateway that only ever reads the fallback source.
    pub fn fallback_only(fallback: Arc<dyn DataSource>) -> Self {
        Self {
            policy: SourcePolicy::Fallback,
            remote: None,
            fallback,
        }
    }

    /// The active policy.
    pub fn policy(&self) -> SourcePolicy {
        self.policy
    }

    async fn fetch<T, F, Fut>(&self, what: &str, op: F) -> EngineResult<Sourced<T>>
    where
        F: Fn(Arc<dyn DataSource>) -> Fut,
        Fut: Future<Output = EngineResult<T>>,
    {
        let remote = match (self.policy, &self.remote) {
            (SourcePolicy::Fallback, _) | (_, None) => {
                return Ok(Sourced {
                    data: op(self.fallback.clone()).await?,
                    origin: DataOrigin::Fallback,
                    warning: None,
                });
            }
            (_, Some(remote)) => remote.clone(),
        };

        let remote_name = remote.name().to_string();
        match op(remote).await {
            Ok(data) => {
                debug!(source = %remote_name, what = what, "Read from remote source");
                Ok(Sourced {
                    data,
                    origin: DataOrigin::Remote,
                    warning: None,
                })
            }
            Err(e) if self.policy == SourcePolicy::RemoteWithFallback => {
                warn!(
                    source = %remote_name,
                    what = what,
                    error = %e,
                    "Remote source failed, serving fallback data"
                );
                let data = op(self.fallback.clone()).await?;
                Ok(Sourced {
                    data,
                    origin: DataOrigin::Fallback,
                    warning: Some(AuditWarning::new(
                        FALLBACK_WARNING_CODE,
                        format!(
                            "Payroll backend unavailable; {} shown from fallback data ({})",
                            what, e
                        ),
                        "warning",
                    )),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Payroll policies.
    pub async fn policies(&self) -> EngineResult<Sourced<Vec<PayrollPolicy>>> {
        self.fetch("policies", |s| async move { s.policies().await })
            .await
    }

    /// Employees.
    pub async fn employees(&self) -> EngineResult<Sourced<Vec<Employee>>> {
        self.fetch("employees", |s| async move { s.employees().await })
            .await
    }

    /// Payroll cycles.
    pub async fn cycles(&self) -> EngineResult<Sourced<Vec<PayrollCycle>>> {
        self.fetch("cycles", |s| async move { s.cycles().await }).await
    }

    /// Everything a payroll run for `start..=end` reads, from a single source.
    pub async fn dataset(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Sourced<PayrollDataset>> {
        self.fetch("payroll data", |s| async move { s.dataset(start, end).await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::models::Business;
    use crate::source::{FallbackSource, RemoteSource};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn fallback() -> Arc<dyn DataSource> {
        Arc::new(FallbackSource::new(PayrollDataset {
            businesses: vec![Business {
                id: 1,
                name: "Fallback Co".to_string(),
            }],
            ..Default::default()
        }))
    }

    fn remote(server: &MockServer) -> Arc<dyn DataSource> {
        Arc::new(
            RemoteSource::new(&BackendConfig {
                base_url: server.base_url(),
                token: Some("token".to_string()),
                timeout: Duration::from_secs(5),
            })
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_remote_success_reports_remote_origin() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/payroll/api/cycles/");
                then.status(200).json_body(json!([{
                    "id": 9, "business": 1, "name": "Monthly", "cycle_type": "MONTHLY",
                    "start_day": 1, "end_day": 31, "is_active": true
                }]));
            })
            .await;

        let gateway =
            DataGateway::new(SourcePolicy::RemoteWithFallback, Some(remote(&server)), fallback())
                .unwrap();
        let cycles = gateway.cycles().await.unwrap();

        assert_eq!(cycles.origin, DataOrigin::Remote);
        assert!(cycles.warning.is_none());
        assert_eq!(cycles.data[0].id, 9);
    }

    #[tokio::test]
    async fn test_remote_failure_degrades_with_warning() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/payroll/api/policies/");
                then.status(503);
            })
            .await;

        let gateway =
            DataGateway::new(SourcePolicy::RemoteWithFallback, Some(remote(&server)), fallback())
                .unwrap();
        let policies = gateway.policies().await.unwrap();

        assert_eq!(policies.origin, DataOrigin::Fallback);
        let warning = policies.warning.unwrap();
        assert_eq!(warning.code, FALLBACK_WARNING_CODE);
        assert!(warning.message.contains("policies"));
    }

    #[tokio::test]
    async fn test_remote_only_policy_propagates_failure() {
        let server = MockServer::start_async().await;
        let gateway =
            DataGateway::new(SourcePolicy::Remote, Some(remote(&server)), fallback()).unwrap();

        let error = gateway.employees().await.unwrap_err();
        assert!(matches!(error, EngineError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_fallback_policy_never_calls_remote() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200).json_body(json!([]));
            })
            .await;

        let gateway =
            DataGateway::new(SourcePolicy::Fallback, Some(remote(&server)), fallback()).unwrap();
        let dataset = gateway
            .dataset(
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            )
            .await
            .unwrap();

        mock.assert_hits_async(0).await;
        assert_eq!(dataset.origin, DataOrigin::Fallback);
        assert_eq!(dataset.data.businesses[0].name, "Fallback Co");
    }

    #[test]
    fn test_remote_policy_without_remote_is_rejected() {
        let result = DataGateway::new(SourcePolicy::Remote, None, fallback());
        assert!(matches!(result, Err(EngineError::Configuration { .. })));
    }
}
