// MaternalCare-api lib.rs
//
// HTTP surface of MaternalCare: routes, handlers, configuration and API docs.

pub mod api;
pub mod config;
pub mod entities;
pub mod openapi;
