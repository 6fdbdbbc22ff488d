//! Core cdash library (session gate, feed reconciliation, API client, config).

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod notice;
pub mod profile;
pub mod routes;
