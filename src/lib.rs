//! Subscriptions API - Subscription tracking with spend summaries
//!
//! This crate records which services users pay for, at what monthly price
//! and over which billing period, and totals spend over a date window.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;
