//! Guest and host time modelling on the NT epoch.
//!
//! Both clock domains share one representation — a 64-bit count of 100 ns
//! intervals since 1601-01-01T00:00:00Z (a FILETIME) — and differ only in
//! their `now()` source: [`HostSystem`] reads the host wall clock,
//! [`GuestSystem`] reads it through the runtime-adjustable guest time
//! scalar. Emitted code that reads a clock funnels through this layer.

mod calendar;
mod clock;
mod nt;

pub use calendar::{decompose, recompose, TimeFields};
pub use clock::Clock;
pub use nt::{
    guest_to_host, host_to_guest, unix_epoch_delta_seconds, GuestSystem, HostSystem, NtInstant,
    TICKS_PER_SECOND,
};

/// FILETIME value of the unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_FILETIME: u64 = 116_444_736_000_000_000;
