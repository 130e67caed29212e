pub mod anomaly;
pub mod averages;
pub mod error;
pub mod return_periods;
