pub mod booking;
pub mod event;
pub mod session;
pub mod settings;
pub mod user;
