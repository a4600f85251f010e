//! Clock-domain conversion and calendar tests against known FILETIME values.

use xenon_time::{
    decompose, recompose, unix_epoch_delta_seconds, HostSystem, NtInstant, TimeFields,
    TICKS_PER_SECOND, UNIX_EPOCH_FILETIME,
};

// All values are 100 ns intervals since 1601-01-01 00:00:00 UTC.
const FT_NT_EPOCH: u64 = 0; // 1601-01-01
const FT_UNIX_EPOCH: u64 = UNIX_EPOCH_FILETIME; // 1970-01-01
const FT_Y2K: u64 = 125_911_584_000_000_000; // 2000-01-01
const FT_LEAP_DAY: u64 = 125_962_560_000_000_000; // 2000-02-29
const FT_SUB_DAY: u64 = 132_538_032_123_450_000; // 2020-12-30 12:00:12.345
const FT_2021: u64 = 132_539_328_000_000_000; // 2021-01-01

type Host = NtInstant<HostSystem>;

#[test]
fn unix_epoch_delta_is_369_years_with_89_leap_days() {
    let expected = (369i64 * 365 + 89) * 86_400;
    assert_eq!(unix_epoch_delta_seconds(), -expected);
    assert!(unix_epoch_delta_seconds() < 0);
}

#[test]
fn file_time_round_trips_exactly() {
    for ft in [
        FT_NT_EPOCH,
        FT_UNIX_EPOCH,
        FT_SUB_DAY,
        2_650_467_743_990_000_000, // ~year 9999
        u64::MAX,
    ] {
        assert_eq!(Host::from_file_time(ft).to_file_time(), ft);
    }
}

#[test]
fn to_sys_hits_known_unix_offsets() {
    use std::time::UNIX_EPOCH;

    let sys = Host::from_file_time(FT_UNIX_EPOCH).to_sys().unwrap();
    assert_eq!(sys, UNIX_EPOCH);

    // 2000-01-01 is 10957 days after the unix epoch.
    let sys = Host::from_file_time(FT_Y2K).to_sys().unwrap();
    let secs = sys.duration_since(UNIX_EPOCH).unwrap().as_secs();
    assert_eq!(secs, 10_957 * 86_400);

    // 2021-01-01 is 18628 days after the unix epoch.
    let sys = Host::from_file_time(FT_2021).to_sys().unwrap();
    let secs = sys.duration_since(UNIX_EPOCH).unwrap().as_secs();
    assert_eq!(secs, 18_628 * 86_400);
}

#[test]
fn sys_round_trip_at_second_granularity() {
    for ft in [FT_NT_EPOCH, FT_UNIX_EPOCH, FT_Y2K, FT_2021] {
        assert_eq!(ft % TICKS_PER_SECOND as u64, 0);
        let back = Host::from_sys(Host::from_file_time(ft).to_sys().unwrap());
        assert_eq!(back.to_file_time(), ft);
    }
    // 100 ns ticks survive too: SystemTime keeps nanoseconds.
    let back = Host::from_sys(Host::from_file_time(FT_SUB_DAY).to_sys().unwrap());
    assert_eq!(back.to_file_time(), FT_SUB_DAY);
}

#[test]
fn decompose_nt_epoch() {
    let tf = decompose(FT_NT_EPOCH);
    assert_eq!(
        (tf.year, tf.month, tf.day, tf.weekday),
        (1601, 1, 1, 1) // Monday
    );
    assert_eq!((tf.hour, tf.minute, tf.second, tf.millisecond), (0, 0, 0, 0));
}

#[test]
fn decompose_unix_epoch() {
    let tf = decompose(FT_UNIX_EPOCH);
    assert_eq!(
        (tf.year, tf.month, tf.day, tf.weekday),
        (1970, 1, 1, 4) // Thursday
    );
    assert_eq!((tf.hour, tf.minute, tf.second, tf.millisecond), (0, 0, 0, 0));
}

#[test]
fn decompose_leap_day() {
    let tf = decompose(FT_LEAP_DAY);
    assert_eq!(
        (tf.year, tf.month, tf.day, tf.weekday),
        (2000, 2, 29, 2) // Tuesday
    );
    assert_eq!(recompose(&tf), FT_LEAP_DAY);
}

#[test]
fn decompose_sub_second() {
    let tf = decompose(FT_SUB_DAY);
    assert_eq!(
        (tf.year, tf.month, tf.day, tf.weekday),
        (2020, 12, 30, 3) // Wednesday
    );
    assert_eq!((tf.hour, tf.minute, tf.second, tf.millisecond), (12, 0, 12, 345));
}

#[test]
fn recompose_known_dates() {
    let fields = |year, month, day, hour, minute, second, millisecond| TimeFields {
        year,
        month,
        day,
        weekday: 0,
        hour,
        minute,
        second,
        millisecond,
    };
    assert_eq!(recompose(&fields(1601, 1, 1, 0, 0, 0, 0)), FT_NT_EPOCH);
    assert_eq!(recompose(&fields(1970, 1, 1, 0, 0, 0, 0)), FT_UNIX_EPOCH);
    assert_eq!(recompose(&fields(2000, 1, 1, 0, 0, 0, 0)), FT_Y2K);
    assert_eq!(recompose(&fields(2000, 2, 29, 0, 0, 0, 0)), FT_LEAP_DAY);
    assert_eq!(recompose(&fields(2020, 12, 30, 12, 0, 12, 345)), FT_SUB_DAY);
    assert_eq!(recompose(&fields(2021, 1, 1, 0, 0, 0, 0)), FT_2021);
}

#[test]
fn decompose_recompose_round_trips() {
    for ft in [
        FT_NT_EPOCH,
        FT_UNIX_EPOCH,
        FT_Y2K,
        FT_LEAP_DAY,
        FT_SUB_DAY,
        FT_2021,
    ] {
        assert_eq!(recompose(&decompose(ft)), ft);
    }
}

#[test]
fn invalid_dates_recompose_to_sentinel() {
    let fields = |year, month, day| TimeFields {
        year,
        month,
        day,
        weekday: 0,
        hour: 0,
        minute: 0,
        second: 0,
        millisecond: 0,
    };
    assert_eq!(recompose(&fields(2000, 2, 30)), 0); // never a date
    assert_eq!(recompose(&fields(2001, 2, 29)), 0); // non-leap year
    assert_eq!(recompose(&fields(1900, 2, 29)), 0); // century rule
    assert_eq!(recompose(&fields(2000, 13, 1)), 0); // month out of range
    assert_eq!(recompose(&fields(2000, 1, 0)), 0); // day zero
    assert_ne!(recompose(&fields(2000, 2, 29)), 0); // 400-year rule
}

#[test]
fn cross_domain_conversion_is_stable_at_unit_scalar() {
    use xenon_time::{guest_to_host, host_to_guest};

    let host_now = Host::now();
    let guest = host_to_guest(host_now);
    let back = guest_to_host(guest);
    // With the default scalar the two domains track each other; the round
    // trip may only drift by the jitter between the paired clock reads.
    assert!((back.ticks() - host_now.ticks()).abs() < TICKS_PER_SECOND);
}

#[test]
fn weekday_uses_c_encoding() {
    let weekday_of = |ft| decompose(ft).weekday;
    assert_eq!(weekday_of(FT_Y2K), 6); // 2000-01-01 Saturday
    assert_eq!(weekday_of(FT_Y2K + 86_400 * TICKS_PER_SECOND as u64), 0); // Sunday
    assert_eq!(weekday_of(FT_2021), 5); // 2021-01-01 Friday
}
