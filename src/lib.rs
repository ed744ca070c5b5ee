#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! CampusSphere: a three-step sign-up flow for a college network.
//!
//! Students register with an official college email, pick a department and
//! land on their section's feed. Authentication is delegated to an
//! [`auth::IdentityProvider`].

pub mod auth;
pub mod config;
pub mod flow;
pub mod logging;
pub mod model;
pub mod storage;
pub mod tui;
