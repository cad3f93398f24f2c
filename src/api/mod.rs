mod query;

pub use query::{configure_routes, ApiResponse, BatchQueryRequest, QueryApiService};
