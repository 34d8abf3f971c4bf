//! Paint model: color parsing and premultiplication for vertex colors.

mod color;

pub use color::Color;
