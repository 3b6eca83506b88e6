//! Domain services used by the HTTP handlers.

pub mod channels;
