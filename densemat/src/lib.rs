mod error;
mod matrix;

pub use error::{Error, Result};
pub use matrix::Matrix;
