#[cfg(test)]
mod tests {
    use babylog::db::shared::SharedStore;
    use babylog::libs::record::{Amount, FeedingFields, RecordFields, RecordId, RecordKind};
    use babylog::libs::range::RangeView;
    use babylog::libs::tracker::SleepTracker;
    use chrono::{Duration, Local, NaiveDate};
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_concurrent_inserts_get_distinct_ids() {
        let store = SharedStore::open_in_memory().unwrap();
        let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .insert(RecordFields::feeding(base + Duration::minutes(i * 15), Amount::Normal, ""))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 16);

        let all = store.with_store(|s| s.list_all(RecordKind::Feeding)).await.unwrap();
        assert_eq!(all.len(), 16);
    }

    #[tokio::test]
    async fn test_filter_view_uses_current_time() {
        let store = SharedStore::open_in_memory().unwrap();
        let now = Local::now().naive_local();

        store.insert(RecordFields::feeding(now - Duration::minutes(1), Amount::Little, "recent")).await.unwrap();
        store.insert(RecordFields::feeding(now - Duration::days(30), Amount::Little, "old")).await.unwrap();

        let week = store.filter_view(RecordKind::Feeding, RangeView::Past7Days).await.unwrap();
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].as_feeding().unwrap().notes, "recent");

        let since = store.list_since(RecordKind::Feeding, now - Duration::days(60)).await.unwrap();
        assert_eq!(since.len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_through_handle() {
        let store = SharedStore::open_in_memory().unwrap();
        let at = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(6, 0, 0).unwrap();
        let id = store.insert(RecordFields::feeding(at, Amount::None, "")).await.unwrap();

        let patch = RecordFields::Feeding(FeedingFields { notes: Some("spat up".into()), ..Default::default() });
        let updated = store.update(RecordKind::Feeding, id.clone(), patch).await.unwrap();
        assert_eq!(updated.as_feeding().unwrap().notes, "spat up");

        store.delete(RecordKind::Feeding, id.clone()).await.unwrap();
        let err = store.get(RecordKind::Feeding, id).await.unwrap_err();
        assert!(err.is_not_found());

        let err = store.delete(RecordKind::Feeding, RecordId::Row(42)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_tracker_runs_on_blocking_pool() {
        let store = SharedStore::open_in_memory().unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(22, 0, 0).unwrap();

        store
            .with_store(move |s| SleepTracker::new().start_tracking(s, start))
            .await
            .unwrap();
        assert_eq!(store.open_sleep_sessions().await.unwrap().len(), 1);

        let record = store
            .with_store(move |s| {
                let mut tracker = SleepTracker::resume(s)?;
                tracker.stop_tracking(s, start + Duration::hours(2))
            })
            .await
            .unwrap();
        assert_eq!(record.end, Some(start + Duration::hours(2)));
    }
}
