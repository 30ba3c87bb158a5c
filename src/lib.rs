pub mod config;
pub mod db;
pub mod domain;
pub mod dto;
pub mod entity;
pub mod error;
pub mod models;
pub mod money;
pub mod response;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod store;
