//! Heartbeat behaviour on the discrete-event clock.

use crate::mock_hw::{
    LateClock, MockFlash, MockHost, MockRadio, RecordingSink, TestNode, make_node, make_node_with,
};
use skynode::app::ports::EmulatedClock;
use skynode::config::NodeConfig;
use skynode::scheduler::TaskId;

#[test]
fn armed_at_construction_one_period_out() {
    let (node, clock, _sink) = make_node();
    assert_eq!(node.heartbeat_armed_at(), Some(0));
    assert_eq!(clock.next_due(), Some(1000));
    assert_eq!(clock.pending(), 1);
}

#[test]
fn fires_every_second_without_drift() {
    let (mut node, mut clock, mut sink) = make_node();
    let n = 25;
    let fired = clock.run_until(n * 1000, |clock, task| {
        assert!(node.on_timer(task, clock, &mut sink));
    });
    assert_eq!(fired as u64, n);
    assert_eq!(node.heartbeat_firings(), n);

    let beats = sink.heartbeats();
    assert_eq!(beats.len() as u64, n);
    for (i, (at, count)) in beats.iter().enumerate() {
        let k = i as u64 + 1;
        assert_eq!(*at, k * 1000);
        assert_eq!(*count, k);
    }
    // Elapsed since arming is exactly N periods.
    let armed = node.heartbeat_armed_at().unwrap();
    assert_eq!(beats.last().unwrap().0 - armed, n * 1000);
}

#[test]
fn never_left_unarmed() {
    let (mut node, mut clock, mut sink) = make_node();
    for _ in 0..10 {
        assert!(clock.step(|clock, task| {
            node.on_timer(task, clock, &mut sink);
        }));
        assert_eq!(clock.pending(), 1, "heartbeat must be re-armed before control returns");
    }
    assert_eq!(clock.now_ms(), 10_000);
}

#[test]
fn honours_configured_period() {
    let (mut node, mut clock, mut sink) = make_node_with(NodeConfig {
        heartbeat_period_ms: 250,
        ..NodeConfig::default()
    });
    clock.run_until(1000, |clock, task| {
        node.on_timer(task, clock, &mut sink);
    });
    assert_eq!(
        sink.heartbeats(),
        vec![(250, 1), (500, 2), (750, 3), (1000, 4)]
    );
}

#[test]
fn foreign_and_stale_firings_ignored() {
    let (mut node, mut clock, mut sink) = make_node();
    assert!(!node.on_timer(TaskId(42), &mut clock, &mut sink));
    // Right task, wrong time.
    assert!(!node.on_timer(node.heartbeat_task(), &mut clock, &mut sink));
    assert!(sink.heartbeats().is_empty());
    assert_eq!(node.heartbeat_firings(), 0);
}

#[test]
fn heartbeat_leaves_leds_alone() {
    let (mut node, mut clock, mut sink) = make_node();
    clock.run_until(5000, |clock, task| {
        node.on_timer(task, clock, &mut sink);
    });
    assert!(sink.mode_changes().is_empty());
    assert_eq!(sink.events.len(), 5);
}

fn late_node(lag_ms: u64) -> (TestNode, LateClock, RecordingSink) {
    let mut clock = LateClock::new(lag_ms);
    let node = TestNode::new(
        NodeConfig::default(),
        &MockHost::sky(),
        MockRadio::new(),
        MockFlash::new(),
        &mut clock,
    )
    .unwrap();
    (node, clock, RecordingSink::new())
}

#[test]
fn late_clock_keeps_heartbeat_alive_on_grid() {
    let (mut node, mut clock, mut sink) = late_node(1);
    for _ in 0..10 {
        let task = clock.fire_next().expect("heartbeat must stay armed");
        assert!(node.on_timer(task, &mut clock, &mut sink));
        assert_eq!(clock.pending(), 1);
    }
    assert_eq!(node.heartbeat_firings(), 10);
    let expected: Vec<(u64, u64)> = (1..=10).map(|k| (k * 1000 + 1, k)).collect();
    assert_eq!(sink.heartbeats(), expected);
}

#[test]
fn clock_lagging_more_than_a_period_skips_ahead() {
    let (mut node, mut clock, mut sink) = late_node(2500);
    for _ in 0..5 {
        let task = clock.fire_next().expect("heartbeat must stay armed");
        assert!(node.on_timer(task, &mut clock, &mut sink));
    }
    assert_eq!(node.heartbeat_firings(), 5);
    let times: Vec<u64> = sink.heartbeats().iter().map(|(at, _)| *at).collect();
    assert_eq!(times, vec![3500, 6500, 9500, 12_500, 15_500]);
}

#[test]
fn heartbeat_reports_wall_time_never_decreasing() {
    let (mut node, mut clock, mut sink) = make_node();
    clock.run_until(5000, |clock, task| {
        node.on_timer(task, clock, &mut sink);
    });
    let walls = sink.wall_times();
    assert_eq!(walls.len(), 5);
    assert!(walls.windows(2).all(|w| w[0] <= w[1]), "{walls:?}");
    for event in &sink.events {
        assert!(event.drift_ms().is_some());
    }
}
