pub mod config;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod policy;
pub mod repository;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
