pub mod donors;
pub mod risk;
