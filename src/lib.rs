pub mod delay_line;
pub mod error;
pub mod filter;
pub mod fir;
pub mod taps;

pub use delay_line::DelayLine;
pub use error::{FirError, Result};
pub use filter::Filter;
pub use fir::FirFilter;
pub use taps::TapSet;
