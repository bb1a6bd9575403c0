pub mod load;
pub mod types;

pub use types::{
    DEFAULT_FONT_SIZE, DEFAULT_GRID_COLUMNS, DEFAULT_SHRINK_DIVISOR, GridConfig,
    MAX_FONT_SIZE, MAX_GRID_DIMENSION, SAMPLE_INTERVAL_SECONDS, SUPPORTED_OUTPUT_EXTENSIONS,
};
