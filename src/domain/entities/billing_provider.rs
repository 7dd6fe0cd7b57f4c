use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Which billing backend the process talks to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[derive(Default)]
pub enum BillingProvider {
    #[default]
    Stripe,
    Dummy,
}

impl BillingProvider {
    /// Human-readable display name for the provider
    pub fn display_name(&self) -> &'static str {
        match self {
            BillingProvider::Stripe => "Stripe",
            BillingProvider::Dummy => "Test Provider",
        }
    }

    /// Whether calls leave the process
    pub fn is_remote(&self) -> bool {
        matches!(self, BillingProvider::Stripe)
    }
}
