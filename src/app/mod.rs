//! Application core: pure domain orchestration, all I/O behind ports.
//!
//! The [`session::Session`] ties the line decoder, reading parser,
//! threshold evaluator, reading log and alert state machine together for
//! one transport connection.  Everything it touches outside itself is a
//! trait in [`ports`], so the whole pipeline runs against mocks in tests.

pub mod commands;
pub mod events;
pub mod ports;
pub mod session;
