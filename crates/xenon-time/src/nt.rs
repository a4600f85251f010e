use std::marker::PhantomData;
use std::sync::atomic::{fence, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::calendar::days_from_civil;
use crate::clock::Clock;

/// 100 ns ticks per second.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Seconds from the unix epoch back to the NT epoch. Computed from the
/// calendar definitions (369 years, 89 of them leap) rather than written as
/// a literal; negative because 1601 precedes 1970.
pub const fn unix_epoch_delta_seconds() -> i64 {
    days_from_civil(1601, 1, 1) * 86_400
}

/// Clock domain marker: the host wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HostSystem;

/// Clock domain marker: the guest clock, which runs at the host clock scaled
/// by [`Clock::guest_time_scalar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GuestSystem;

/// A point in time on the NT epoch, tagged with its clock domain so guest
/// and host instants cannot be mixed without an explicit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NtInstant<D> {
    ticks: i64,
    _domain: PhantomData<D>,
}

impl<D> NtInstant<D> {
    /// Identity cast from the 64-bit FILETIME representation.
    pub const fn from_file_time(ft: u64) -> Self {
        NtInstant {
            ticks: ft as i64,
            _domain: PhantomData,
        }
    }

    /// Identity cast back to the 64-bit FILETIME representation.
    pub const fn to_file_time(self) -> u64 {
        self.ticks as u64
    }

    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    pub const fn add_ticks(self, ticks: i64) -> Self {
        NtInstant {
            ticks: self.ticks + ticks,
            _domain: PhantomData,
        }
    }
}

impl NtInstant<HostSystem> {
    pub fn now() -> Self {
        Self::from_file_time(Clock::query_host_system_time())
    }

    /// Convert to the epoch-1970 system clock. `None` when the platform's
    /// `SystemTime` cannot represent the value.
    pub fn to_sys(self) -> Option<SystemTime> {
        let unix_ticks = self
            .ticks
            .checked_add(unix_epoch_delta_seconds() * TICKS_PER_SECOND)?;
        let magnitude = unix_ticks.unsigned_abs();
        let dur = Duration::new(
            magnitude / TICKS_PER_SECOND as u64,
            (magnitude % TICKS_PER_SECOND as u64) as u32 * 100,
        );
        if unix_ticks >= 0 {
            UNIX_EPOCH.checked_add(dur)
        } else {
            UNIX_EPOCH.checked_sub(dur)
        }
    }

    /// Convert from the epoch-1970 system clock, truncating sub-tick
    /// precision. Round-trips exactly when the host clock's resolution is
    /// 100 ns or finer; whole-second values round-trip regardless.
    pub fn from_sys(t: SystemTime) -> Self {
        let unix_ticks = match t.duration_since(UNIX_EPOCH) {
            Ok(d) => (d.as_nanos() / 100) as i64,
            Err(e) => -((e.duration().as_nanos() / 100) as i64),
        };
        NtInstant {
            ticks: unix_ticks - unix_epoch_delta_seconds() * TICKS_PER_SECOND,
            _domain: PhantomData,
        }
    }
}

impl NtInstant<GuestSystem> {
    pub fn now() -> Self {
        Self::from_file_time(Clock::query_guest_system_time())
    }
}

/// Convert a guest instant to the host domain.
///
/// Both clocks are snapshotted between acquire-release fences so their
/// relative order is fixed; the delta is measured in the guest domain and
/// scaled into host time unless scaling is disabled.
pub fn guest_to_host(t: NtInstant<GuestSystem>) -> NtInstant<HostSystem> {
    fence(Ordering::AcqRel);
    let host_now = NtInstant::<HostSystem>::now();
    let guest_now = NtInstant::<GuestSystem>::now();
    fence(Ordering::AcqRel);

    let mut delta = t.ticks() - guest_now.ticks();
    if !Clock::no_scaling() {
        delta = (delta as f64 * Clock::guest_time_scalar()).floor() as i64;
    }
    host_now.add_ticks(delta)
}

/// Convert a host instant to the guest domain; inverse scaling of
/// [`guest_to_host`].
pub fn host_to_guest(t: NtInstant<HostSystem>) -> NtInstant<GuestSystem> {
    fence(Ordering::AcqRel);
    let host_now = NtInstant::<HostSystem>::now();
    let guest_now = NtInstant::<GuestSystem>::now();
    fence(Ordering::AcqRel);

    let mut delta = t.ticks() - host_now.ticks();
    if !Clock::no_scaling() {
        delta = (delta as f64 / Clock::guest_time_scalar()).floor() as i64;
    }
    guest_now.add_ticks(delta)
}
