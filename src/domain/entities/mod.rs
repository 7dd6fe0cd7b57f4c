pub mod billing_provider;
pub mod payment;
pub mod subscription;
pub mod user;
