pub mod config;
pub mod display;
pub mod orchestrator;
pub mod pick;
pub mod routing;
pub mod session;
pub mod suggest;
pub mod util;
pub mod waypoints;
