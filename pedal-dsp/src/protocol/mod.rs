//! Serial control protocol.
//!
//! ```text
//!  RX interrupt                     main loop
//!  ───────────                      ─────────
//!  push_byte ─► LineBuffer ─ready─► take_line ─► Command::parse ─► apply ─► send_response
//! ```
//!
//! The protocol is receiver-silent: unknown or short lines get no reply
//! and no error frame.

pub mod command;
pub mod dispatch;
pub mod line_buffer;


pub use command::{Command, DelayUpdate, GateUpdate, OverdriveUpdate, Target};
pub use dispatch::{apply, dispatch_line, send_response, Response};
pub use line_buffer::{LineBuffer, RxEvent};
