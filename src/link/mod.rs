//! Telemetry link: transport chunks → complete lines → readings.
//!
//! ```text
//!  Transport ──chunk──▶ LineDecoder ──line──▶ parse_line ──▶ Reading
//!   (20 B MTU)          (heapless, 1 KiB)      (lenient)
//! ```

pub mod codec;
pub mod parser;
pub mod transport;
