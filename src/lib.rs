pub mod config;
pub mod db;
pub mod http;
pub mod metrics;
pub mod report;
pub mod simulation;
pub mod validate;
