pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery, deserialize_string_to_i64};
pub use response::ApiResponse;
