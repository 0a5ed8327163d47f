//! HTTP route handlers

pub mod detect;
pub mod health;
pub mod pages;
