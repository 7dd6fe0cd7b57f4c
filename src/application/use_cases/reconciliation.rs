//! Drift detection between the local mirror and the billing provider.
//!
//! The report is read-only: nothing here writes to either side. Repairing
//! drift is left to whoever reads the report.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    app_error::AppResult,
    application::{
        ports::billing_provider::{BillingProviderPort, SubscriptionId},
        use_cases::subscription_mirror::{SubscriptionRepoTrait, unix_to_naive},
    },
    domain::entities::subscription::{Subscription, SubscriptionStatus},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drift {
    /// The provider has no subscription with the mirrored id
    MissingRemote,
    StatusMismatch {
        local: SubscriptionStatus,
        remote: SubscriptionStatus,
    },
    NextBillingMismatch {
        local: NaiveDateTime,
        remote: NaiveDateTime,
    },
    /// The provider lookup failed; the row could not be checked
    ProviderUnavailable { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftEntry {
    pub subscription_id: i32,
    pub stripe_sub_id: String,
    pub drift: Drift,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    pub checked: usize,
    pub entries: Vec<DriftEntry>,
}

impl ReconciliationReport {
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone)]
pub struct ReconciliationUseCases {
    provider: Arc<dyn BillingProviderPort>,
    subscription_repo: Arc<dyn SubscriptionRepoTrait>,
}

impl ReconciliationUseCases {
    pub fn new(
        provider: Arc<dyn BillingProviderPort>,
        subscription_repo: Arc<dyn SubscriptionRepoTrait>,
    ) -> Self {
        Self {
            provider,
            subscription_repo,
        }
    }

    /// Compare every mirrored subscription against the provider.
    ///
    /// A provider failure on one row is recorded as `ProviderUnavailable` and
    /// the run continues; only a failure to read the local store aborts.
    #[instrument(skip(self))]
    pub async fn diff_subscriptions(&self) -> AppResult<ReconciliationReport> {
        let local = self.subscription_repo.list_all().await?;
        let mut report = ReconciliationReport {
            checked: local.len(),
            entries: Vec::new(),
        };

        for sub in &local {
            for drift in self.diff_one(sub).await {
                warn!(
                    subscription_id = sub.id,
                    stripe_sub_id = %sub.stripe_sub_id,
                    drift = ?drift,
                    "Mirror drift detected"
                );
                report.entries.push(DriftEntry {
                    subscription_id: sub.id,
                    stripe_sub_id: sub.stripe_sub_id.clone(),
                    drift,
                });
            }
        }

        info!(
            checked = report.checked,
            drifted = report.entries.len(),
            "Reconciliation finished"
        );
        Ok(report)
    }

    async fn diff_one(&self, local: &Subscription) -> Vec<Drift> {
        let remote = match self
            .provider
            .get_subscription(&SubscriptionId::new(&local.stripe_sub_id))
            .await
        {
            Ok(Some(remote)) => remote,
            Ok(None) => return vec![Drift::MissingRemote],
            Err(e) => {
                return vec![Drift::ProviderUnavailable {
                    error: e.to_string(),
                }];
            }
        };

        let mut drifts = Vec::new();

        if remote.status != local.status {
            drifts.push(Drift::StatusMismatch {
                local: local.status.clone(),
                remote: remote.status.clone(),
            });
        }

        // Billing dates stop mattering once both sides agree it is canceled.
        let both_canceled = local.status.is_canceled() && remote.status.is_canceled();
        if !both_canceled {
            if let Some(remote_next) = unix_to_naive(remote.current_period_end) {
                if remote_next != local.next_billing_day {
                    drifts.push(Drift::NextBillingMismatch {
                        local: local.next_billing_day,
                        remote: remote_next,
                    });
                }
            }
        }

        drifts
    }
}
