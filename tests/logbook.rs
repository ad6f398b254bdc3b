#[cfg(test)]
mod tests {
    use sportlog::db::db::Db;
    use sportlog::db::gateway::SharedGateway;
    use sportlog::db::sqlite::SqliteGateway;
    use sportlog::db::users::{NewUser, ROLE_ADMIN, ROLE_GUEST};
    use sportlog::libs::activity::{ActivityDraft, RawNumber, SportType};
    use sportlog::libs::error::LogbookError;
    use sportlog::libs::logbook::{Logbook, ResetScope, ResetSummary};
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    struct LogbookTestContext {
        _temp_dir: TempDir,
        logbook: Arc<Logbook>,
        alice: i64,
        bob: i64,
    }

    impl AsyncTestContext for LogbookTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let gateway: SharedGateway = Arc::new(SqliteGateway::open(&temp_dir.path().join("logbook.db")).unwrap());
            let db = Db::with_gateway(gateway).await.unwrap();
            let logbook = Logbook::new(db.gateway.clone());

            let alice = logbook.users().create(&NewUser::new("alice")).await.unwrap();
            let bob = logbook.users().create(&NewUser::new("bob")).await.unwrap();

            LogbookTestContext {
                _temp_dir: temp_dir,
                logbook: Arc::new(logbook),
                alice,
                bob,
            }
        }
    }

    fn jump(date: &str, freefall: i64) -> ActivityDraft {
        let mut draft = ActivityDraft::new(SportType::Skydiving, date);
        draft.freefall_time = Some(RawNumber::Integer(freefall));
        draft
    }

    fn run(date: &str, distance: &str) -> ActivityDraft {
        let mut draft = ActivityDraft::new(SportType::Running, date);
        draft.distance = Some(distance.into());
        draft
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_create_derives_skydiving_totals(ctx: &mut LogbookTestContext) {
        let first = ctx.logbook.create(ctx.alice, &jump("2025-04-01", 60)).await.unwrap();
        assert_eq!(first.jump_number, Some(1));
        assert_eq!(first.total_jumps, Some(1));
        assert_eq!(first.total_freefall_time, Some(60));
        assert_eq!(first.time, "00:00");
        assert!(first.created_at.is_some());

        let second = ctx.logbook.create(ctx.alice, &jump("2025-04-01", 45)).await.unwrap();
        assert_eq!(second.jump_number, Some(2));
        assert_eq!(second.total_jumps, Some(2));
        assert_eq!(second.total_freefall_time, Some(105));
        assert!(second.id > first.id);
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_create_rounds_running_total(ctx: &mut LogbookTestContext) {
        ctx.logbook.create(ctx.alice, &run("2025-05-01", "5.2")).await.unwrap();
        let second = ctx.logbook.create(ctx.alice, &run("2025-05-03", "3.75")).await.unwrap();

        assert_eq!(second.distance, Some(3.75));
        assert_eq!(second.total_distance, Some(9.0));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_blank_fields_are_stored_as_null(ctx: &mut LogbookTestContext) {
        let mut draft = ActivityDraft::new(SportType::ScubaDiving, "2025-06-10");
        draft.bottom_time = Some("".into());
        draft.depth = Some("".into());
        draft.visibility = Some("good".to_string());

        let dive = ctx.logbook.create(ctx.alice, &draft).await.unwrap();
        assert_eq!(dive.bottom_time, None);
        assert_eq!(dive.depth, None);
        assert_eq!(dive.dive_number, Some(1));
        assert_eq!(dive.total_bottom_time, Some(0));
        assert_eq!(dive.visibility.as_deref(), Some("good"));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_oversized_integers_are_stored_as_null(ctx: &mut LogbookTestContext) {
        ctx.logbook.create(ctx.alice, &jump("2025-04-01", 60)).await.unwrap();

        let mut draft = ActivityDraft::new(SportType::Skydiving, "2025-04-02");
        draft.freefall_time = Some("3000000000".into());
        let second = ctx.logbook.create(ctx.alice, &draft).await.unwrap();

        assert_eq!(second.freefall_time, None);
        assert_eq!(second.jump_number, Some(2));
        assert_eq!(second.total_freefall_time, Some(60));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_histories_are_per_user_and_sport(ctx: &mut LogbookTestContext) {
        ctx.logbook.create(ctx.alice, &jump("2025-04-01", 60)).await.unwrap();
        ctx.logbook.create(ctx.alice, &run("2025-04-02", "10")).await.unwrap();

        let bobs_jump = ctx.logbook.create(ctx.bob, &jump("2025-04-03", 30)).await.unwrap();
        assert_eq!(bobs_jump.jump_number, Some(1));
        assert_eq!(bobs_jump.total_freefall_time, Some(30));

        let alices_jump = ctx.logbook.create(ctx.alice, &jump("2025-04-04", 50)).await.unwrap();
        assert_eq!(alices_jump.jump_number, Some(2));
        assert_eq!(alices_jump.total_freefall_time, Some(110));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_backfilled_entry_builds_on_latest_inserted(ctx: &mut LogbookTestContext) {
        ctx.logbook.create(ctx.alice, &jump("2025-04-10", 60)).await.unwrap();
        let backfilled = ctx.logbook.create(ctx.alice, &jump("2024-01-01", 40)).await.unwrap();

        assert_eq!(backfilled.jump_number, Some(2));
        assert_eq!(backfilled.total_freefall_time, Some(100));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_create_requires_sport_and_date(ctx: &mut LogbookTestContext) {
        let no_sport = ActivityDraft {
            date: "2025-01-01".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ctx.logbook.create(ctx.alice, &no_sport).await,
            Err(LogbookError::MissingField("sport_type"))
        ));

        let no_date = ActivityDraft::new(SportType::Running, " ");
        assert!(matches!(
            ctx.logbook.create(ctx.alice, &no_date).await,
            Err(LogbookError::MissingField("date"))
        ));

        let bad_date = ActivityDraft::new(SportType::Running, "01/02/2025");
        assert!(matches!(
            ctx.logbook.create(ctx.alice, &bad_date).await,
            Err(LogbookError::InvalidDate(_))
        ));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_list_orders_by_date_and_filters(ctx: &mut LogbookTestContext) {
        ctx.logbook.create(ctx.alice, &run("2025-01-05", "5")).await.unwrap();
        ctx.logbook.create(ctx.alice, &jump("2025-03-01", 60)).await.unwrap();
        ctx.logbook.create(ctx.alice, &run("2025-02-10", "8")).await.unwrap();
        ctx.logbook.create(ctx.bob, &run("2025-02-11", "3")).await.unwrap();

        let all = ctx.logbook.list(ctx.alice, None).await.unwrap();
        let dates: Vec<&str> = all.iter().map(|a| a.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-01", "2025-02-10", "2025-01-05"]);

        let runs = ctx.logbook.list(ctx.alice, Some(SportType::Running)).await.unwrap();
        assert_eq!(runs.len(), 2);
        assert!(runs.iter().all(|a| a.sport_type == SportType::Running && a.user_id == ctx.alice));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_get_hides_other_users_activities(ctx: &mut LogbookTestContext) {
        let activity = ctx.logbook.create(ctx.alice, &run("2025-01-05", "5")).await.unwrap();

        assert_eq!(ctx.logbook.get(ctx.alice, activity.id).await.unwrap(), activity);
        assert!(matches!(
            ctx.logbook.get(ctx.bob, activity.id).await,
            Err(LogbookError::NotFound(id)) if id == activity.id
        ));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_update_keeps_derived_totals(ctx: &mut LogbookTestContext) {
        let first = ctx.logbook.create(ctx.alice, &jump("2025-04-01", 60)).await.unwrap();

        let mut draft = ActivityDraft::from(&first);
        draft.freefall_time = Some(RawNumber::Integer(90));
        draft.location = Some("Empuriabrava".to_string());
        draft.time = Some("14:30".to_string());
        let updated = ctx.logbook.update(ctx.alice, first.id, &draft).await.unwrap();

        assert_eq!(updated.freefall_time, Some(90));
        assert_eq!(updated.location.as_deref(), Some("Empuriabrava"));
        assert_eq!(updated.time, "14:30");
        assert_eq!(updated.total_freefall_time, Some(60));
        assert_eq!(updated.total_jumps, Some(1));
        assert_eq!(updated.sport_type, SportType::Skydiving);
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_update_of_foreign_activity_is_not_found(ctx: &mut LogbookTestContext) {
        let activity = ctx.logbook.create(ctx.alice, &run("2025-01-05", "5")).await.unwrap();
        let draft = ActivityDraft::from(&activity);

        assert!(matches!(
            ctx.logbook.update(ctx.bob, activity.id, &draft).await,
            Err(LogbookError::NotFound(_))
        ));
        assert!(matches!(
            ctx.logbook.update(ctx.alice, 9999, &draft).await,
            Err(LogbookError::NotFound(9999))
        ));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_delete_missing_or_foreign_is_not_found(ctx: &mut LogbookTestContext) {
        let activity = ctx.logbook.create(ctx.alice, &run("2025-01-05", "5")).await.unwrap();

        assert!(matches!(
            ctx.logbook.delete(ctx.alice, 424242).await,
            Err(LogbookError::NotFound(424242))
        ));
        assert!(matches!(
            ctx.logbook.delete(ctx.bob, activity.id).await,
            Err(LogbookError::NotFound(_))
        ));

        ctx.logbook.delete(ctx.alice, activity.id).await.unwrap();
        assert!(ctx.logbook.list(ctx.alice, None).await.unwrap().is_empty());
        assert!(matches!(
            ctx.logbook.delete(ctx.alice, activity.id).await,
            Err(LogbookError::NotFound(_))
        ));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_career_reads_latest_totals(ctx: &mut LogbookTestContext) {
        for (date, freefall) in [("2025-04-01", 60), ("2025-04-02", 55), ("2025-04-03", 65)] {
            ctx.logbook.create(ctx.alice, &jump(date, freefall)).await.unwrap();
        }
        ctx.logbook.create(ctx.alice, &run("2025-04-04", "12.3")).await.unwrap();

        let skydiving = ctx.logbook.career(ctx.alice, SportType::Skydiving).await.unwrap();
        assert_eq!(skydiving.activities, 3);
        assert_eq!(skydiving.totals.total_jumps, Some(3));
        assert_eq!(skydiving.totals.total_freefall_time, Some(180));

        let all = ctx.logbook.career_all(ctx.alice).await.unwrap();
        let sports: Vec<SportType> = all.iter().map(|c| c.sport_type).collect();
        assert_eq!(sports, vec![SportType::Skydiving, SportType::Running]);

        let diving = ctx.logbook.career(ctx.bob, SportType::ScubaDiving).await.unwrap();
        assert_eq!(diving.activities, 0);
        assert_eq!(diving.totals.total_bottom_time, None);
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_do_not_lose_updates(ctx: &mut LogbookTestContext) {
        let mut handles = Vec::new();
        for _ in 0..20 {
            let logbook = Arc::clone(&ctx.logbook);
            let user = ctx.alice;
            handles.push(tokio::spawn(async move {
                logbook.create(user, &jump("2025-07-01", 10)).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut jumps = ctx.logbook.list(ctx.alice, Some(SportType::Skydiving)).await.unwrap();
        jumps.sort_by_key(|a| a.id);
        let numbers: Vec<i64> = jumps.iter().filter_map(|a| a.jump_number).collect();
        assert_eq!(numbers, (1..=20).collect::<Vec<i64>>());
        assert_eq!(jumps.last().unwrap().total_freefall_time, Some(200));
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_guest_resets_own_activities(ctx: &mut LogbookTestContext) {
        let users = ctx.logbook.users();
        let guest_id = users.create(&NewUser::new("visitor").with_role(ROLE_GUEST)).await.unwrap();
        ctx.logbook.create(guest_id, &run("2025-01-05", "5")).await.unwrap();
        ctx.logbook.create(guest_id, &jump("2025-01-06", 60)).await.unwrap();
        ctx.logbook.create(ctx.bob, &run("2025-01-07", "7")).await.unwrap();

        let guest = users.get(guest_id).await.unwrap().unwrap();
        let scope = ResetScope::for_user(&guest).unwrap();
        assert_eq!(scope, ResetScope::Own(guest_id));

        let summary = ctx.logbook.reset(scope).await.unwrap();
        assert_eq!(summary, ResetSummary { activities: 2, users: 0 });
        assert!(ctx.logbook.list(guest_id, None).await.unwrap().is_empty());
        assert!(users.get(guest_id).await.unwrap().is_some());
        assert_eq!(ctx.logbook.list(ctx.bob, None).await.unwrap().len(), 1);
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_regular_user_may_not_reset(ctx: &mut LogbookTestContext) {
        ctx.logbook.create(ctx.alice, &run("2025-01-05", "5")).await.unwrap();

        let alice = ctx.logbook.users().get(ctx.alice).await.unwrap().unwrap();
        assert_eq!(alice.role, "user");
        assert_eq!(ResetScope::for_user(&alice), None);
        assert_eq!(ctx.logbook.list(ctx.alice, None).await.unwrap().len(), 1);
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_admin_reset_removes_everything_and_guests(ctx: &mut LogbookTestContext) {
        let users = ctx.logbook.users();
        let admin_id = users.create(&NewUser::new("root").with_role(ROLE_ADMIN)).await.unwrap();
        let guest_id = users.create(&NewUser::new("visitor").with_role(ROLE_GUEST)).await.unwrap();

        ctx.logbook.create(ctx.alice, &run("2025-01-05", "5")).await.unwrap();
        ctx.logbook.create(ctx.bob, &run("2025-01-06", "6")).await.unwrap();
        ctx.logbook.create(guest_id, &jump("2025-01-07", 60)).await.unwrap();

        let admin = users.get(admin_id).await.unwrap().unwrap();
        let scope = ResetScope::for_user(&admin).unwrap();
        assert_eq!(scope, ResetScope::Everything);

        let summary = ctx.logbook.reset(scope).await.unwrap();
        assert_eq!(summary, ResetSummary { activities: 3, users: 1 });
        assert!(users.get(guest_id).await.unwrap().is_none());
        assert!(users.get(ctx.alice).await.unwrap().is_some());
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_reset_releases_writer_locks(ctx: &mut LogbookTestContext) {
        let guest_id = ctx
            .logbook
            .users()
            .create(&NewUser::new("visitor").with_role(ROLE_GUEST))
            .await
            .unwrap();
        ctx.logbook.create(guest_id, &run("2025-01-05", "5")).await.unwrap();
        ctx.logbook.create(guest_id, &jump("2025-01-06", 60)).await.unwrap();
        ctx.logbook.create(ctx.alice, &run("2025-01-07", "7")).await.unwrap();
        assert_eq!(ctx.logbook.writer_locks(), 3);

        ctx.logbook.reset(ResetScope::Everything).await.unwrap();
        assert_eq!(ctx.logbook.writer_locks(), 0);

        let fresh = ctx.logbook.create(ctx.alice, &run("2025-02-01", "4")).await.unwrap();
        assert_eq!(fresh.total_distance, Some(4.0));
        assert_eq!(ctx.logbook.writer_locks(), 1);
    }

    #[test_context(LogbookTestContext)]
    #[tokio::test]
    async fn test_user_named_admin_is_admin(ctx: &mut LogbookTestContext) {
        let id = ctx.logbook.users().create(&NewUser::new("admin")).await.unwrap();
        let user = ctx.logbook.users().get(id).await.unwrap().unwrap();

        assert_eq!(user.role, "user");
        assert!(user.is_admin());
        assert_eq!(ResetScope::for_user(&user), Some(ResetScope::Everything));
    }
}
