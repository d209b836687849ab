pub mod clip;
pub mod config;
pub mod constants;
pub mod interleave;
pub mod label;
pub mod logging;
pub mod media;
pub mod plan;
pub mod randomize;
pub mod report;
pub mod tools;
pub mod utils;
