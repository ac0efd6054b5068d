pub mod request_id;
pub mod user;

pub use request_id::{make_span_with_request_id, request_id_middleware, RequestId};
pub use user::{current_user_middleware, CurrentUser};
