pub mod input;
pub mod logging;
pub mod prompt;
pub mod render;
