pub mod app;
pub mod batch;
pub mod logging;
pub mod prompt;
pub mod report;
pub mod utils;
