//! Wires the mirror use cases to in-memory doubles.

use std::sync::Arc;

use crate::{
    application::use_cases::{
        reconciliation::ReconciliationUseCases, subscription_mirror::MirrorUseCases,
    },
    test_utils::{
        InMemoryPaymentRepo, InMemorySubscriptionRepo, InMemoryUserRepo, MockBillingProvider,
    },
};

/// Use cases plus handles on every double they talk to.
pub struct MirrorHarness {
    pub provider: Arc<MockBillingProvider>,
    pub users: Arc<InMemoryUserRepo>,
    pub subscriptions: Arc<InMemorySubscriptionRepo>,
    pub payments: Arc<InMemoryPaymentRepo>,
    pub use_cases: MirrorUseCases,
    pub reconciliation: ReconciliationUseCases,
}

impl MirrorHarness {
    pub fn new() -> Self {
        let provider = Arc::new(MockBillingProvider::new());
        let users = Arc::new(InMemoryUserRepo::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepo::new(users.clone()));
        let payments = Arc::new(InMemoryPaymentRepo::new());

        let use_cases = MirrorUseCases::new(
            provider.clone(),
            users.clone(),
            subscriptions.clone(),
            payments.clone(),
        );
        let reconciliation = ReconciliationUseCases::new(provider.clone(), subscriptions.clone());

        Self {
            provider,
            users,
            subscriptions,
            payments,
            use_cases,
            reconciliation,
        }
    }
}
