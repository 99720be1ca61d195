//! Domain aggregates exposed by the admin service layer.

pub mod audit;
pub mod client;
pub mod money;
pub mod permissions;
pub mod proposal;
pub mod tax_credit;
pub mod types;
