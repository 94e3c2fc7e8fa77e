pub mod config;
pub mod engines;
pub mod error;
pub mod job_controller;
pub mod services;
pub mod storage;
