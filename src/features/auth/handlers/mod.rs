pub mod auth_handler;

pub use auth_handler::{
    __path_admin_login, __path_get_me, __path_login, __path_logout, __path_signup, admin_login,
    get_me, login, logout, signup,
};
