pub mod gamepad;
pub mod runtime;
pub mod writer;
