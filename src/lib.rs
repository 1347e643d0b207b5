//! Salary engine library crate.
//!
//! This crate implements the computation core of a Vietnamese salary
//! calculator: hourly rate, overtime and night-shift pay, statutory
//! insurance, progressive income tax and net pay, with the exact
//! per-step rounding the breakdown report depends on.  External
//! applications may depend on `salary_engine` and call
//! [`engine::compute`] directly, or embed the HTTP surface via
//! [`api::build_router`].

pub mod api;
pub mod engine;
pub mod form;
pub mod models;
pub mod share;
pub mod tax;
