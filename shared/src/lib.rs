// Data model and locale helpers shared by the engine and the frontend.
pub mod models;
pub mod utils;

pub use utils::brazilian_format;
