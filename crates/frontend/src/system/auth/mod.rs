pub mod api;
pub mod context;
pub mod guard;
pub mod permissions;
pub mod session;
pub mod storage;

pub use context::{provide_session, use_session, SessionContext};
pub use guard::{IfPermitted, RequirePermission};
pub use permissions::PermissionEvaluator;
pub use session::{AuthError, Session, SessionStore};
