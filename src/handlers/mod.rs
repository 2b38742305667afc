pub mod auth;
pub mod config;
pub mod icons;
pub mod qr;
pub mod upload;
