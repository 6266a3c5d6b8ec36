use std::time::Duration;

use crossing_game::scheduler::*;

fn secs(s: f32) -> Duration {
    Duration::from_secs_f32(s)
}

fn drain(s: &mut Scheduler<&'static str>, until: Duration) -> Vec<&'static str> {
    let mut fired = Vec::new();
    while let Some(f) = s.pop_due(until) {
        fired.push(f.event);
    }
    s.settle(until);
    fired
}

#[test]
fn nothing_fires_before_due() {
    let mut s = Scheduler::new();
    s.after(secs(1.0), "a");
    assert!(drain(&mut s, secs(0.5)).is_empty());
    assert_eq!(s.now(), secs(0.5));
    assert_eq!(drain(&mut s, secs(1.0)), vec!["a"]);
    assert!(s.is_empty());
}

#[test]
fn fires_in_due_order_then_schedule_order() {
    let mut s = Scheduler::new();
    s.after(secs(2.0), "late");
    s.after(secs(1.0), "first");
    s.after(secs(1.0), "second");
    assert_eq!(drain(&mut s, secs(3.0)), vec!["first", "second", "late"]);
}

#[test]
fn interval_rearms_until_cancelled() {
    let mut s = Scheduler::new();
    let id = s.every(secs(1.0), "tick");

    assert_eq!(drain(&mut s, secs(3.0)), vec!["tick", "tick", "tick"]);
    assert!(s.is_scheduled(id));

    assert!(s.cancel(id));
    assert!(!s.cancel(id));
    assert!(drain(&mut s, secs(10.0)).is_empty());
}

#[test]
fn handler_can_cancel_its_own_interval() {
    let mut s = Scheduler::new();
    s.every(secs(1.0), "tick");

    let mut count = 0;
    while let Some(fired) = s.pop_due(secs(10.0)) {
        count += 1;
        if count == 2 {
            s.cancel(fired.id);
        }
    }
    assert_eq!(count, 2);
    assert!(s.is_empty());
}

#[test]
fn timers_scheduled_while_firing_start_from_fire_time() {
    let mut s = Scheduler::new();
    s.after(secs(1.0), "spawn");

    let fired = s.pop_due(secs(5.0)).expect("spawn is due");
    assert_eq!(fired.at, secs(1.0));
    assert_eq!(s.now(), secs(1.0));

    s.after(secs(3.0), "expire");
    // Due at 4s, inside the same 5s step
    assert_eq!(drain(&mut s, secs(5.0)), vec!["expire"]);
    assert_eq!(s.now(), secs(5.0));
}

#[test]
fn clock_never_runs_backwards() {
    let mut s: Scheduler<&str> = Scheduler::new();
    s.settle(secs(2.0));
    s.settle(secs(1.0));
    assert_eq!(s.now(), secs(2.0));
}
