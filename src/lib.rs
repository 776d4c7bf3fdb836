//! GED pretest server library
//!
//! Serves the pretest to test-takers, stores their submissions in object
//! storage and gives administrators a dashboard over the results.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
