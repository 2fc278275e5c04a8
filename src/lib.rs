pub mod config;
pub mod domain;
pub mod forms;
pub mod gateway;
pub mod routes;
pub mod services;
