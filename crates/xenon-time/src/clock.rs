use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::nt::{unix_epoch_delta_seconds, TICKS_PER_SECOND};

/// Guest time-base frequency in Hz. The time-base register ticks at this
/// rate from power-on.
pub const TIME_BASE_FREQUENCY: u64 = 49_875_000;

static GUEST_TIME_SCALAR_BITS: AtomicU64 = AtomicU64::new(0x3FF0_0000_0000_0000); // 1.0
static NO_SCALING: AtomicBool = AtomicBool::new(false);
static ANCHOR_FILETIME: OnceLock<u64> = OnceLock::new();

/// Process-wide clock sources and the guest time scalar.
pub struct Clock;

impl Clock {
    /// Host wall clock as a FILETIME.
    pub fn query_host_system_time() -> u64 {
        let unix_ticks = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => (d.as_nanos() / 100) as i64,
            Err(e) => -((e.duration().as_nanos() / 100) as i64),
        };
        (unix_ticks - unix_epoch_delta_seconds() * TICKS_PER_SECOND) as u64
    }

    /// Guest wall clock as a FILETIME: host time with elapsed-since-anchor
    /// scaled by the guest time scalar. The anchor is captured on first use.
    pub fn query_guest_system_time() -> u64 {
        let anchor = *ANCHOR_FILETIME.get_or_init(Self::query_host_system_time);
        let elapsed = Self::query_host_system_time().wrapping_sub(anchor);
        if Self::no_scaling() {
            anchor.wrapping_add(elapsed)
        } else {
            anchor.wrapping_add((elapsed as f64 * Self::guest_time_scalar()) as u64)
        }
    }

    /// Guest time-base register value: elapsed guest time at the time-base
    /// frequency. Emitted `mftb` reads land here.
    pub fn query_guest_time_base() -> u64 {
        let anchor = *ANCHOR_FILETIME.get_or_init(Self::query_host_system_time);
        let elapsed = Self::query_guest_system_time().wrapping_sub(anchor) as u128;
        (elapsed * TIME_BASE_FREQUENCY as u128 / TICKS_PER_SECOND as u128) as u64
    }

    pub fn guest_time_scalar() -> f64 {
        f64::from_bits(GUEST_TIME_SCALAR_BITS.load(Ordering::Relaxed))
    }

    /// Adjust guest clock speed relative to the host. Takes effect for
    /// subsequent reads; already-observed guest times stay in the past.
    pub fn set_guest_time_scalar(scalar: f64) {
        GUEST_TIME_SCALAR_BITS.store(scalar.to_bits(), Ordering::Relaxed);
    }

    pub fn no_scaling() -> bool {
        NO_SCALING.load(Ordering::Relaxed)
    }

    pub fn set_no_scaling(no_scaling: bool) {
        NO_SCALING.store(no_scaling, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNIX_EPOCH_FILETIME;

    #[test]
    fn host_time_is_past_2020() {
        // 2020-01-01 as FILETIME.
        const FT_2020: u64 = 132_223_104_000_000_000;
        assert!(Clock::query_host_system_time() > FT_2020);
        assert!(Clock::query_host_system_time() > UNIX_EPOCH_FILETIME);
    }

    #[test]
    fn guest_time_tracks_host_at_unit_scalar() {
        let guest = Clock::query_guest_system_time();
        let host = Clock::query_host_system_time();
        // Within a second of each other while the scalar is 1.0.
        assert!(host.abs_diff(guest) < TICKS_PER_SECOND as u64);
    }

    #[test]
    fn time_base_is_monotonic() {
        let a = Clock::query_guest_time_base();
        let b = Clock::query_guest_time_base();
        assert!(b >= a);
    }
}
