//! Receipt Service - printable payment receipts for traffic citations.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod receipt;
pub mod services;
pub mod startup;
