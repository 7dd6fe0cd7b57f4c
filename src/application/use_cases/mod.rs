pub mod catalog;
pub mod reconciliation;
pub mod subscription_mirror;
