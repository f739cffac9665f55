#[cfg(test)]
mod tests {
    use babylog::db::records::RecordStore;
    use babylog::libs::error::StoreError;
    use babylog::libs::range::DateRange;
    use babylog::libs::record::{
        Amount, FeedingFields, GrowthFields, Record, RecordFields, RecordId, RecordKind, SleepFields,
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RecordsTestContext {
        _temp_dir: TempDir,
        db_path: PathBuf,
        store: RecordStore,
    }

    impl TestContext for RecordsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db_path = temp_dir.path().join("babylog.db");
            let store = RecordStore::open(&db_path).unwrap();
            RecordsTestContext { _temp_dir: temp_dir, db_path, store }
        }
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_feeding_round_trip(ctx: &mut RecordsTestContext) {
        let id = ctx.store.insert(RecordFields::feeding(at(5, 8, 30), Amount::ALot, "bottle")).unwrap();

        let record = ctx.store.get(RecordKind::Feeding, &id).unwrap();
        let feeding = record.as_feeding().unwrap();
        assert_eq!(feeding.datetime, at(5, 8, 30));
        assert_eq!(feeding.amount, Amount::ALot);
        assert_eq!(feeding.notes, "bottle");
        assert_eq!(record.id(), id);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_row_ids_increase(ctx: &mut RecordsTestContext) {
        let first = ctx.store.insert(RecordFields::sleep(at(1, 22, 0), Some(at(2, 6, 0)))).unwrap();
        let second = ctx.store.insert(RecordFields::sleep(at(2, 22, 0), Some(at(3, 6, 0)))).unwrap();

        match (first, second) {
            (RecordId::Row(a), RecordId::Row(b)) => assert!(b > a),
            other => panic!("unexpected ids {:?}", other),
        }
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_unrecognized_amount_round_trips(ctx: &mut RecordsTestContext) {
        let id = ctx.store.insert(RecordFields::feeding(at(5, 9, 0), Amount::parse("bogus"), "")).unwrap();

        let record = ctx.store.get(RecordKind::Feeding, &id).unwrap();
        assert_eq!(record.as_feeding().unwrap().amount, Amount::Unrecognized("bogus".to_string()));
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_null_amount_stays_null_after_update(ctx: &mut RecordsTestContext) {
        let raw = Connection::open(&ctx.db_path).unwrap();
        raw.execute(
            "INSERT INTO feeding_records (datetime, amount, notes) VALUES ('2024-03-05 08:00:00', NULL, '')",
            [],
        )
        .unwrap();
        let id = RecordId::Row(raw.last_insert_rowid());

        let patch = RecordFields::Feeding(FeedingFields { notes: Some("burped".into()), ..Default::default() });
        let updated = ctx.store.update(RecordKind::Feeding, &id, patch).unwrap();
        assert_eq!(updated.as_feeding().unwrap().amount, Amount::Unrecognized(String::new()));

        let amount: Option<String> = raw
            .query_row("SELECT amount FROM feeding_records WHERE notes = 'burped'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(amount, None);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_growth_gets_time_based_key(ctx: &mut RecordsTestContext) {
        let first = ctx.store.insert(RecordFields::growth(60.5, 6.2, at(1, 0, 0))).unwrap();
        let second = ctx.store.insert(RecordFields::growth(61.0, 6.4, at(8, 0, 0))).unwrap();

        let (RecordId::Key(a), RecordId::Key(b)) = (&first, &second) else {
            panic!("growth ids must be keys");
        };
        assert_ne!(a, b);
        assert!(a.parse::<i64>().is_ok());

        let record = ctx.store.get(RecordKind::Growth, &second).unwrap();
        let growth = record.as_growth().unwrap();
        assert_eq!(growth.height, 61.0);
        assert_eq!(growth.weight, 6.4);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_partial_update_keeps_other_fields(ctx: &mut RecordsTestContext) {
        let id = ctx.store.insert(RecordFields::feeding(at(5, 8, 0), Amount::Little, "left side")).unwrap();

        let patch = RecordFields::Feeding(FeedingFields { amount: Some(Amount::Normal), ..Default::default() });
        let updated = ctx.store.update(RecordKind::Feeding, &id, patch).unwrap();

        let feeding = updated.as_feeding().unwrap();
        assert_eq!(feeding.amount, Amount::Normal);
        assert_eq!(feeding.notes, "left side");
        assert_eq!(feeding.datetime, at(5, 8, 0));
        assert_eq!(ctx.store.get(RecordKind::Feeding, &id).unwrap(), updated);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_update_can_reopen_sleep(ctx: &mut RecordsTestContext) {
        let id = ctx.store.insert(RecordFields::sleep(at(1, 22, 0), Some(at(2, 6, 0)))).unwrap();

        let patch = RecordFields::Sleep(SleepFields { start: None, end: Some(None) });
        let updated = ctx.store.update(RecordKind::Sleep, &id, patch).unwrap();

        assert!(updated.as_sleep().unwrap().is_open());
        assert_eq!(ctx.store.open_sleep_sessions().unwrap().len(), 1);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_update_rejects_end_before_start(ctx: &mut RecordsTestContext) {
        let id = ctx.store.insert(RecordFields::sleep(at(1, 22, 0), Some(at(2, 6, 0)))).unwrap();

        let patch = RecordFields::Sleep(SleepFields { start: Some(at(2, 7, 0)), end: None });
        let err = ctx.store.update(RecordKind::Sleep, &id, patch).unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        let stored = ctx.store.get(RecordKind::Sleep, &id).unwrap();
        assert_eq!(stored.as_sleep().unwrap().start, at(1, 22, 0));
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_update_with_wrong_kind_fails(ctx: &mut RecordsTestContext) {
        let id = ctx.store.insert(RecordFields::feeding(at(5, 8, 0), Amount::Normal, "")).unwrap();

        let patch = RecordFields::Growth(GrowthFields { height: Some(50.0), ..Default::default() });
        let err = ctx.store.update(RecordKind::Feeding, &id, patch).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_missing_ids_are_not_found(ctx: &mut RecordsTestContext) {
        let missing = RecordId::Row(999);

        assert!(ctx.store.get(RecordKind::Sleep, &missing).unwrap_err().is_not_found());
        assert!(ctx.store.delete(RecordKind::Sleep, &missing).unwrap_err().is_not_found());

        let patch = RecordFields::Sleep(SleepFields { start: Some(at(1, 0, 0)), end: None });
        assert!(ctx.store.update(RecordKind::Sleep, &missing, patch).unwrap_err().is_not_found());

        let key = RecordId::Key("1700000000000".to_string());
        assert!(ctx.store.get(RecordKind::Growth, &key).unwrap_err().is_not_found());
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_delete_twice(ctx: &mut RecordsTestContext) {
        let id = ctx.store.insert(RecordFields::feeding(at(5, 8, 0), Amount::Normal, "")).unwrap();

        ctx.store.delete(RecordKind::Feeding, &id).unwrap();
        let err = ctx.store.delete(RecordKind::Feeding, &id).unwrap_err();

        assert!(matches!(err, StoreError::NotFound { kind: RecordKind::Feeding, .. }));
        assert!(ctx.store.list_all(RecordKind::Feeding).unwrap().is_empty());
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_insert_validation(ctx: &mut RecordsTestContext) {
        let no_time = RecordFields::Feeding(FeedingFields { amount: Some(Amount::Normal), ..Default::default() });
        assert!(matches!(ctx.store.insert(no_time).unwrap_err(), StoreError::Validation(_)));

        let backwards = RecordFields::sleep(at(2, 6, 0), Some(at(1, 22, 0)));
        assert!(matches!(ctx.store.insert(backwards).unwrap_err(), StoreError::Validation(_)));

        let negative = RecordFields::growth(-1.0, 5.0, at(1, 0, 0));
        assert!(matches!(ctx.store.insert(negative).unwrap_err(), StoreError::Validation(_)));

        assert!(ctx.store.list_all(RecordKind::Sleep).unwrap().is_empty());
        assert!(ctx.store.list_all(RecordKind::Growth).unwrap().is_empty());
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_list_since_is_inclusive_and_newest_first(ctx: &mut RecordsTestContext) {
        for (day, hour) in [(3, 9), (5, 9), (4, 9), (2, 9)] {
            ctx.store.insert(RecordFields::feeding(at(day, hour, 0), Amount::Normal, "")).unwrap();
        }

        let records = ctx.store.list_since(RecordKind::Feeding, at(3, 9, 0)).unwrap();
        let times: Vec<NaiveDateTime> = records.iter().map(Record::timestamp).collect();

        assert_eq!(times, vec![at(5, 9, 0), at(4, 9, 0), at(3, 9, 0)]);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_list_between_excludes_records_after_end(ctx: &mut RecordsTestContext) {
        ctx.store.insert(RecordFields::sleep(at(3, 12, 0), Some(at(3, 13, 0)))).unwrap();
        ctx.store.insert(RecordFields::sleep(at(10, 11, 0), Some(at(10, 11, 30)))).unwrap();
        ctx.store.insert(RecordFields::sleep(at(10, 14, 0), None)).unwrap();
        ctx.store.insert(RecordFields::sleep(at(1, 12, 0), Some(at(1, 13, 0)))).unwrap();

        let range = DateRange { start: at(3, 12, 0), end: at(10, 12, 0) };
        let records = ctx.store.list_between(RecordKind::Sleep, &range).unwrap();
        let starts: Vec<NaiveDateTime> = records.iter().map(Record::timestamp).collect();

        assert_eq!(starts, vec![at(10, 11, 0), at(3, 12, 0)]);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_multiple_open_sessions_are_all_returned(ctx: &mut RecordsTestContext) {
        ctx.store.insert(RecordFields::sleep(at(1, 22, 0), None)).unwrap();
        ctx.store.insert(RecordFields::sleep(at(2, 22, 0), None)).unwrap();
        ctx.store.insert(RecordFields::sleep(at(3, 1, 0), Some(at(3, 2, 0)))).unwrap();

        let open = ctx.store.open_sleep_sessions().unwrap();
        assert_eq!(open.len(), 2);
        assert_eq!(open[0].start, at(2, 22, 0));
    }

    #[test]
    fn test_close_reports_success() {
        let store = RecordStore::open_in_memory().unwrap();
        store.close().unwrap();
    }
}
