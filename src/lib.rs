//! Rule-driven sizing of residential solar installations.
//!
//! A validated [`catalog::RuleCatalog`] maps total load to an inverter, a
//! battery bank, and a panel array; [`sizing::compute_sizing`] applies it to
//! a [`profile::LoadProfile`].

#[cfg(feature = "api")]
pub mod api;
pub mod catalog;
pub mod config;
pub mod io;
pub mod profile;
pub mod recommend;
pub mod report;
/// Rule selection and derived equipment figures.
pub mod sizing;
