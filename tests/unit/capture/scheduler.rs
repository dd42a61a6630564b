use super::*;

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new();
    let other = clock.clone();
    clock.advance(Duration::from_millis(40));
    assert_eq!(other.elapsed(), Duration::from_millis(40));
    other.set(Duration::from_secs(2));
    assert_eq!(clock.elapsed(), Duration::from_secs(2));
}

#[tokio::test]
async fn stepped_scheduler_advances_one_frame_per_tick() {
    let clock = ManualClock::new();
    let fps = Fps::whole(30);
    let mut sched = SteppedScheduler::new(clock.clone(), fps);
    for _ in 0..30 {
        sched.next_frame().await;
    }
    assert_eq!(sched.ticks(), 30);
    assert_eq!(fps.frame_at(clock.elapsed()), 30);
}

#[tokio::test(start_paused = true)]
async fn paint_scheduler_paces_by_frame_duration() {
    let mut sched = PaintScheduler::new(Fps::whole(30));
    let start = tokio::time::Instant::now();
    // First tick completes immediately.
    for _ in 0..4 {
        sched.next_frame().await;
    }
    let elapsed = start.elapsed();
    assert!(elapsed >= Fps::whole(30).frame_duration() * 3);
}
