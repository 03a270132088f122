//! HTTP route handlers.

pub mod admin;
pub mod lease;
pub mod ticket;
pub mod web;
