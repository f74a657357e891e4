pub mod review;
pub mod classification;

pub use review::*;
pub use classification::*;
