pub mod candidate;
pub mod data;
pub mod error;
pub mod lcg;
pub mod parser;
pub mod solver;
