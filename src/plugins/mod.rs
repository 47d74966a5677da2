pub mod navigation;
pub mod telemetry;
