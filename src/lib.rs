pub mod calendar;
pub mod catalog;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod reconcile;
pub mod store;
pub mod templates_structs;
