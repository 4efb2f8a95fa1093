pub mod aml;
pub mod api;
pub mod audit;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod observability;
pub mod policy;
pub mod rules;
pub mod scoring;
