//! Keystroke injection for ringtype.
//!
//! The typing core only produces [`Keystroke`] values; a [`KeySink`] turns
//! them into real input events for whatever window currently has focus.

pub mod keystroke;
pub mod macros;
pub mod sink;

pub use keystroke::{Keystroke, NamedKey};
pub use sink::{CommandSink, CommandTemplate, InjectError, KeySink, LogSink, RecordingSink};
