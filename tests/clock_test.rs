//! ThreadClock and Divider against real time. Periods are kept at a
//! millisecond so the suite stays fast.

use std::thread;
use std::time::Duration;

use m6502::{Clock, Divider, ThreadClock};

const PERIOD: Duration = Duration::from_millis(1);

#[test]
fn starts_at_zero_and_advances() {
    let clock = ThreadClock::new(PERIOD);
    assert_eq!(clock.ticks(), 0);

    assert_eq!(clock.start(), 0);
    let observed = clock.wait(5);
    assert!(observed >= 5);
    assert!(clock.ticks() >= 5);

    clock.stop();
}

#[test]
fn wait_returns_immediately_when_passed() {
    let clock = ThreadClock::new(PERIOD);
    clock.start();
    clock.wait(3);

    // Already reached: no blocking, count not below the target.
    let observed = clock.wait(1);
    assert!(observed >= 3);

    clock.stop();
}

#[test]
fn ticks_are_monotonic() {
    let clock = ThreadClock::new(PERIOD);
    clock.start();

    let mut last = clock.ticks();
    for _ in 0..10 {
        let now = clock.wait(last + 1);
        assert!(now >= last);
        last = now;
    }

    clock.stop();
}

#[test]
fn stop_freezes_the_counter() {
    let clock = ThreadClock::new(PERIOD);
    clock.start();
    clock.wait(3);
    clock.stop();

    let frozen = clock.ticks();
    thread::sleep(PERIOD * 10);
    assert_eq!(clock.ticks(), frozen);

    // Stopping again is a no-op.
    clock.stop();
    assert_eq!(clock.ticks(), frozen);
}

#[test]
fn restart_resumes_from_frozen_count() {
    let clock = ThreadClock::new(PERIOD);
    clock.start();
    clock.wait(3);
    clock.stop();
    let frozen = clock.ticks();

    let resumed_at = clock.start();
    assert_eq!(resumed_at, frozen);
    assert!(clock.wait(frozen + 3) >= frozen + 3);

    clock.stop();
}

#[test]
fn start_is_idempotent_while_running() {
    let clock = ThreadClock::new(PERIOD);
    clock.start();
    clock.wait(2);

    let again = clock.start();
    assert!(again >= 2);

    // Still a single producer: the counter keeps a sane pace rather than
    // doubling. Coarse bound only, timing is best-effort.
    let before = clock.ticks();
    let after = clock.wait(before + 5);
    assert!(after >= before + 5);

    clock.stop();
}

#[test]
fn clones_share_the_counter() {
    let clock = ThreadClock::new(PERIOD);
    let consumer = clock.clone();

    clock.start();
    let handle = thread::spawn(move || consumer.wait(4));
    let observed = handle.join().unwrap();
    assert!(observed >= 4);

    clock.stop();
}

#[test]
fn multiple_waiters_for_the_same_tick_all_release() {
    let clock = ThreadClock::new(PERIOD);
    clock.start();
    let target = clock.ticks() + 5;

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let waiter = clock.clone();
            thread::spawn(move || waiter.wait(target))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap() >= target);
    }

    clock.stop();
}

#[test]
fn divider_scales_the_master_domain() {
    let master = ThreadClock::new(PERIOD);
    let cpu_clock = Divider::new(master.clone(), 4);

    cpu_clock.start();
    let observed = cpu_clock.wait(2);
    assert!(observed >= 2);
    assert!(master.ticks() >= 8);

    cpu_clock.stop();
    assert_eq!(master.ticks() / 4, cpu_clock.ticks());
}
