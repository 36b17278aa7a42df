use pretty_assertions::assert_eq;

use super::*;

fn ms(n: u64) -> Duration {
	Duration::from_millis(n)
}

fn target(index: u32) -> RetryTarget {
	RetryTarget {
		surface: NodeId::new(index, 0),
		editor: None,
	}
}

#[test]
fn test_debounce_collapses_burst() {
	let t0 = Instant::now();
	let mut debounce = Debounce::new(RESCAN_DEBOUNCE);

	for step in 0..10 {
		debounce.request(t0 + ms(step * 20));
	}
	let last = t0 + ms(180);
	assert!(!debounce.poll(last + ms(149)));
	assert!(debounce.poll(last + ms(150)));
	assert!(!debounce.poll(last + ms(1_000)));
	assert!(!debounce.is_pending());
}

#[test]
fn test_trailing_fires_once_after_last_trigger() {
	let t0 = Instant::now();
	let mut trailing = Trailing::new(SEARCH_TRAILING);

	trailing.trigger(t0);
	trailing.trigger(t0 + ms(100));
	assert_eq!(trailing.deadline(), Some(t0 + ms(400)));
	assert!(!trailing.poll(t0 + ms(300)));
	assert!(trailing.poll(t0 + ms(400)));
	assert!(!trailing.poll(t0 + ms(800)));
}

#[test]
fn test_interval_keeps_phase_and_collapses_missed_periods() {
	let t0 = Instant::now();
	let mut interval = Interval::new(PERIODIC_INTERVAL);
	interval.start(t0);
	interval.start(t0 + ms(500));
	assert_eq!(interval.deadline(), Some(t0 + ms(800)));

	assert!(!interval.poll(t0 + ms(799)));
	assert!(interval.poll(t0 + ms(5_000)));
	assert!(!interval.poll(t0 + ms(5_000)));
	assert_eq!(interval.deadline(), Some(t0 + ms(5_800)));

	interval.stop();
	assert!(!interval.poll(t0 + ms(60_000)));
}

#[test]
fn test_poll_reports_due_work_in_order() {
	let t0 = Instant::now();
	let mut timers = Coalescer::new();
	timers.request_rescan(t0);
	timers.request_search_update(t0);
	timers.request_history_update(t0);
	timers.start_periodic(t0);
	timers.schedule_switch_retry(t0, target(1));
	timers.schedule_load_retry(t0, target(2));

	let due = timers.poll(t0 + ms(1_000));
	assert_eq!(
		due.into_vec(),
		vec![
			Due::Rescan,
			Due::SearchUpdate,
			Due::HistoryUpdate,
			Due::PeriodicCheck,
			Due::SwitchRetry(target(1)),
			Due::LoadRetry(target(2)),
		]
	);
	assert_eq!(timers.live_timers(), 1, "only the periodic check stays armed");
}

#[test]
fn test_switch_retry_is_replaced() {
	let t0 = Instant::now();
	let mut timers = Coalescer::new();
	timers.schedule_switch_retry(t0, target(1));
	timers.schedule_switch_retry(t0 + ms(100), target(2));

	assert!(timers.poll(t0 + ms(300)).is_empty());
	assert_eq!(timers.poll(t0 + ms(400)).into_vec(), vec![Due::SwitchRetry(target(2))]);
}

#[test]
fn test_load_retries_are_per_surface() {
	let t0 = Instant::now();
	let mut timers = Coalescer::new();
	timers.schedule_load_retry(t0, target(1));
	timers.schedule_load_retry(t0 + ms(50), target(2));
	timers.schedule_load_retry(t0 + ms(100), target(1));
	assert_eq!(timers.live_timers(), 2);

	assert_eq!(timers.poll(t0 + ms(250)).into_vec(), vec![Due::LoadRetry(target(2))]);
	assert_eq!(timers.poll(t0 + ms(300)).into_vec(), vec![Due::LoadRetry(target(1))]);
	assert_eq!(timers.live_timers(), 0);
}

#[test]
fn test_next_deadline_is_earliest() {
	let t0 = Instant::now();
	let mut timers = Coalescer::new();
	assert_eq!(timers.next_deadline(), None);

	timers.start_periodic(t0);
	timers.schedule_load_retry(t0, target(1));
	timers.request_rescan(t0 + ms(20));
	assert_eq!(timers.next_deadline(), Some(t0 + ms(170)));
}

#[test]
fn test_cancel_all_disarms_everything() {
	let t0 = Instant::now();
	let mut timers = Coalescer::new();
	timers.request_rescan(t0);
	timers.request_search_update(t0);
	timers.request_history_update(t0);
	timers.start_periodic(t0);
	timers.schedule_switch_retry(t0, target(1));
	timers.schedule_load_retry(t0, target(2));
	assert_eq!(timers.live_timers(), 6);

	timers.cancel_all();
	assert_eq!(timers.live_timers(), 0);
	assert_eq!(timers.next_deadline(), None);
	assert!(timers.poll(t0 + ms(60_000)).is_empty());
}
