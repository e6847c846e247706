//! Time subsystem.
//!
//! [`Clock`] paces a blocking main loop: call `tick(target_fps)` once per
//! frame to cap the frame rate and read back the elapsed delta.

mod clock;

pub use clock::Clock;
