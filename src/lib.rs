//! ZT Admin Backend Library
//!
//! Exposes the gateway's modules for the binary and integration tests.

pub mod auth;
pub mod config;
pub mod controller;
pub mod web;
