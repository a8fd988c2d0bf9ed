pub mod config;
pub mod errors;
pub mod output;
pub mod seat;
pub mod shell;
pub mod surface;
