pub mod auth;
pub mod email;
pub mod hierarchy;
pub mod notifications;
pub mod seed;
pub mod uploads;
