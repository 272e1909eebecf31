pub mod auth;
pub mod booking;
pub mod event;
pub mod health;
pub mod home;
pub mod member;
pub mod settings;
