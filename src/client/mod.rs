pub mod error;
pub mod regions;
pub mod streamflow_client;
