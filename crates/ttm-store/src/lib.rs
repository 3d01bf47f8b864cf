mod file_store;
mod route;

pub use file_store::JsonFileStore;
pub use route::{order_stops, Route, RouteRepository};
