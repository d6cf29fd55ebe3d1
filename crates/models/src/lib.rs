pub mod db;
pub mod errors;
pub mod service;
pub mod user;
pub mod user_credentials;
