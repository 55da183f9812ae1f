//! Infrastructure adapters

mod reqwest_response;
mod system_clock;

pub use reqwest_response::{CaptureError, capture_response};
pub use system_clock::SystemClock;
