pub mod measure;
pub mod wrapper;

pub use measure::{AverageWidthMeasurer, TextMeasurer};
pub use wrapper::{dedent, max_chars_per_line, wrap_line};
