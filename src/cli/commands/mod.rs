pub mod alerts;
pub mod completions;
pub mod config;
pub mod customers;
pub mod dashboard;
pub mod login;
pub mod logout;
pub mod plans;
pub mod profile;
pub mod stations;
pub mod watch;
