#[cfg(test)]
mod tests {
    use babylog::db::records::RecordStore;
    use babylog::libs::error::StoreError;
    use babylog::libs::metrics::{sleep_duration_minutes, SleepDuration};
    use babylog::libs::record::{RecordFields, RecordId, RecordKind};
    use babylog::libs::tracker::{SleepTracker, TrackerState};
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use test_context::{test_context, TestContext};

    struct TrackerTestContext {
        store: RecordStore,
        tracker: SleepTracker,
        start: NaiveDateTime,
    }

    impl TestContext for TrackerTestContext {
        fn setup() -> Self {
            TrackerTestContext {
                store: RecordStore::open_in_memory().unwrap(),
                tracker: SleepTracker::new(),
                start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(22, 0, 0).unwrap(),
            }
        }
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_start_then_stop(ctx: &mut TrackerTestContext) {
        let id = ctx.tracker.start_tracking(&mut ctx.store, ctx.start).unwrap();
        assert!(ctx.tracker.is_tracking());
        assert_eq!(ctx.store.open_sleep_sessions().unwrap().len(), 1);

        let record = ctx.tracker.stop_tracking(&mut ctx.store, ctx.start + Duration::minutes(510)).unwrap();

        assert_eq!(RecordId::Row(record.id), id);
        assert_eq!(sleep_duration_minutes(record.start, record.end).unwrap(), SleepDuration::Minutes(510));
        assert_eq!(ctx.tracker.state(), TrackerState::Idle);
        assert!(ctx.store.open_sleep_sessions().unwrap().is_empty());
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_stop_at_start_time_fails(ctx: &mut TrackerTestContext) {
        ctx.tracker.start_tracking(&mut ctx.store, ctx.start).unwrap();

        let err = ctx.tracker.stop_tracking(&mut ctx.store, ctx.start).unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert!(ctx.tracker.is_tracking());
        assert_eq!(ctx.tracker.started_at(), Some(ctx.start));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_start_twice_fails(ctx: &mut TrackerTestContext) {
        ctx.tracker.start_tracking(&mut ctx.store, ctx.start).unwrap();

        let err = ctx.tracker.start_tracking(&mut ctx.store, ctx.start + Duration::minutes(5)).unwrap_err();

        assert!(matches!(err, StoreError::AlreadyTracking));
        assert_eq!(ctx.store.list_all(RecordKind::Sleep).unwrap().len(), 1);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_stop_while_idle_fails(ctx: &mut TrackerTestContext) {
        let err = ctx.tracker.stop_tracking(&mut ctx.store, ctx.start).unwrap_err();
        assert!(matches!(err, StoreError::NotTracking));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_second_tracker_sees_open_session(ctx: &mut TrackerTestContext) {
        ctx.tracker.start_tracking(&mut ctx.store, ctx.start).unwrap();

        let mut other = SleepTracker::new();
        let err = other.start_tracking(&mut ctx.store, ctx.start + Duration::minutes(1)).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyTracking));

        let mut resumed = SleepTracker::resume(&ctx.store).unwrap();
        assert_eq!(resumed.started_at(), Some(ctx.start));
        assert_eq!(resumed.elapsed(ctx.start + Duration::minutes(90)), Some(Duration::minutes(90)));

        let record = resumed.stop_tracking(&mut ctx.store, ctx.start + Duration::minutes(90)).unwrap();
        assert_eq!(record.end, Some(ctx.start + Duration::minutes(90)));
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_deleted_session_returns_tracker_to_idle(ctx: &mut TrackerTestContext) {
        let id = ctx.tracker.start_tracking(&mut ctx.store, ctx.start).unwrap();
        ctx.store.delete(RecordKind::Sleep, &id).unwrap();

        let err = ctx.tracker.stop_tracking(&mut ctx.store, ctx.start + Duration::minutes(30)).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(ctx.tracker.state(), TrackerState::Idle);
    }

    #[test_context(TrackerTestContext)]
    #[test]
    fn test_resume_with_no_open_session_is_idle(ctx: &mut TrackerTestContext) {
        ctx.store
            .insert(RecordFields::sleep(ctx.start, Some(ctx.start + Duration::hours(1))))
            .unwrap();

        let tracker = SleepTracker::resume(&ctx.store).unwrap();
        assert_eq!(tracker.state(), TrackerState::Idle);
        assert_eq!(tracker.elapsed(ctx.start), None);
    }
}
