//! HTTP request handlers

pub mod arrivals;
pub mod common;
pub mod departures;
pub mod health;
pub mod route;
pub mod stations;
