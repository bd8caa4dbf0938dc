pub mod extract;
pub mod guard;
pub mod response;
pub mod session;

pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use guard::{AdminUser, AuthUser};
pub use response::{ApiResponse, ApiResult};
pub use session::{session_middleware, CurrentSession};
