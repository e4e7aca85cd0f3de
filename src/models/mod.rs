pub mod appointment;
pub mod slot;


pub use appointment::*;
pub use slot::*;
