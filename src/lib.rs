//! carpool-planner core
//!
//! Picks the visiting order for a shared ride of 2 to 4 stops, gates it on
//! per-stop detour availability, and splits the trip fare among the riders.

pub mod traits;
pub mod error;
pub mod config;
pub mod matrix;
pub mod route;
pub mod availability;
pub mod fare;
pub mod planner;
pub mod kakao;
pub mod haversine;

pub use error::{PlannerError, ProviderError};
pub use planner::{RoutePlanner, RouteQuote, RouteRequest};
