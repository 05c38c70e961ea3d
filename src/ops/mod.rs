pub mod draw;
pub mod fill;
