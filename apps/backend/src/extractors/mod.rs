pub mod auth_token;
pub mod current_user;
pub mod session_cookie;

pub use auth_token::AuthToken;
pub use current_user::{CookieUser, CurrentUser};
pub use session_cookie::SessionCookie;
