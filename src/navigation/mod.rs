//! Routing and the guard that keeps game sessions in step with it.

mod guard;
mod routes;

pub use guard::{NavigationGuard, Transition};
pub use routes::{Route, RouteMatch, RouteTable, RouteTarget, NOT_FOUND};
