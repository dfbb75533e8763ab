//! KYC onboarding wizard: step schemas, the wizard controller and the HTTP
//! host around them.

pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod notify;
pub mod save;
pub mod steps;
pub mod wizard;
