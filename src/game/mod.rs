pub mod movegen;
pub mod rules;
pub mod utils;
