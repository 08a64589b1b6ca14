//! HRM Portal: employee roster and daily attendance, with attendance statistics.
//!
//! Data lives behind a [`store::RecordStore`] (the HRM REST API or the HR
//! database). Screen state is held by the [`controller`]s, aggregation lives in
//! [`analytics`], and [`routes`] exposes the screens as JSON views.

pub mod analytics;
pub mod api;
pub mod config;
pub mod controller;
pub mod db;
pub mod docs;
pub mod model;
pub mod routes;
pub mod store;
pub mod validation;
