pub mod app_state;
pub mod format;
pub mod io_struct;
pub mod server;
pub mod stream;
