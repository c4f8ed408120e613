pub mod health;
pub mod print;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use print::{print_number, route_not_found};
