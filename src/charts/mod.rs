pub mod bands;
pub mod composer;
pub mod error;
pub mod flow_duration;
pub mod options;
pub mod render;
