//! Small helpers shared by the compiler and the matcher
mod side;

pub use side::Side;
