pub mod components;
pub mod crud;
pub mod dialogs;
pub mod http;
pub mod state;
