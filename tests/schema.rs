#[cfg(test)]
mod tests {
    use sportlog::db::dialect::Engine;
    use sportlog::db::error::GatewayError;
    use sportlog::db::gateway::QueryGateway;
    use sportlog::db::schema::{initialize, SchemaManager};
    use sportlog::db::sqlite::SqliteGateway;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    const USER_COLUMNS: usize = 10;
    const ACTIVITY_COLUMNS: usize = 26;

    struct SchemaTestContext {
        _temp_dir: TempDir,
        gateway: SqliteGateway,
    }

    impl AsyncTestContext for SchemaTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let gateway = SqliteGateway::open(&temp_dir.path().join("schema.db")).unwrap();
            SchemaTestContext {
                _temp_dir: temp_dir,
                gateway,
            }
        }
    }

    async fn column_names(gateway: &SqliteGateway, table: &str) -> Vec<String> {
        let result = gateway
            .execute(&format!("PRAGMA table_info({})", table), &[])
            .await
            .unwrap();
        result
            .rows
            .iter()
            .map(|row| row.get_text("name").unwrap().unwrap())
            .collect()
    }

    #[test]
    fn test_step_order() {
        let manager = SchemaManager::new(Engine::Sqlite);
        let names = manager.step_names();

        assert_eq!(names[0], "create_users_table");
        assert_eq!(names[1], "create_activities_table");
        assert!(names.contains(&"add_activities_total_bottom_time"));
        assert_eq!(names.last(), Some(&"index_activities_user_sport"));

        let phone_column = names.iter().position(|n| *n == "add_users_phone_number").unwrap();
        let phone_index = names.iter().position(|n| *n == "index_users_phone_number").unwrap();
        assert!(phone_column < phone_index);
    }

    #[test_context(SchemaTestContext)]
    #[tokio::test]
    async fn test_fresh_database(ctx: &mut SchemaTestContext) {
        let report = initialize(&ctx.gateway).await.unwrap();
        let steps = SchemaManager::new(Engine::Sqlite).step_names().len();

        assert_eq!(report.applied + report.skipped, steps);
        // Every additive column is part of the fresh tables already
        assert_eq!(report.skipped, 15);

        assert_eq!(column_names(&ctx.gateway, "users").await.len(), USER_COLUMNS);
        assert_eq!(column_names(&ctx.gateway, "activities").await.len(), ACTIVITY_COLUMNS);
    }

    #[test_context(SchemaTestContext)]
    #[tokio::test]
    async fn test_bootstrap_is_idempotent(ctx: &mut SchemaTestContext) {
        let first = initialize(&ctx.gateway).await.unwrap();
        let second = initialize(&ctx.gateway).await.unwrap();
        let third = initialize(&ctx.gateway).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(column_names(&ctx.gateway, "users").await.len(), USER_COLUMNS);
        assert_eq!(column_names(&ctx.gateway, "activities").await.len(), ACTIVITY_COLUMNS);

        let tables = ctx
            .gateway
            .execute(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'activities')",
                &[],
            )
            .await
            .unwrap();
        assert_eq!(tables.affected, 2);
    }

    #[test_context(SchemaTestContext)]
    #[tokio::test]
    async fn test_legacy_tables_gain_missing_columns(ctx: &mut SchemaTestContext) {
        ctx.gateway
            .execute(
                "CREATE TABLE users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username VARCHAR(255),
                    password VARCHAR(255) NOT NULL,
                    language VARCHAR(10) DEFAULT 'en',
                    role VARCHAR(20) DEFAULT 'user',
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                )",
                &[],
            )
            .await
            .unwrap();
        ctx.gateway
            .execute(
                "CREATE TABLE activities (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id),
                    date VARCHAR(50) NOT NULL,
                    time VARCHAR(50) NOT NULL,
                    location TEXT,
                    latitude REAL,
                    longitude REAL,
                    height REAL,
                    depth REAL,
                    distance REAL,
                    sport_type VARCHAR(50) NOT NULL,
                    notes TEXT,
                    jump_number INTEGER,
                    total_jumps INTEGER,
                    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                )",
                &[],
            )
            .await
            .unwrap();
        ctx.gateway
            .execute(
                "INSERT INTO users (username, password) VALUES ($1, $2)",
                &["veteran".into(), "!".into()],
            )
            .await
            .unwrap();
        ctx.gateway
            .execute(
                "INSERT INTO activities (user_id, date, time, sport_type, jump_number, total_jumps)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    1.into(),
                    "2019-05-01".into(),
                    "10:00".into(),
                    "skydiving".into(),
                    200.into(),
                    200.into(),
                ],
            )
            .await
            .unwrap();

        let report = initialize(&ctx.gateway).await.unwrap();
        assert_eq!(report.skipped, 0);

        let users = column_names(&ctx.gateway, "users").await;
        let activities = column_names(&ctx.gateway, "activities").await;
        assert_eq!(users.len(), USER_COLUMNS);
        assert_eq!(activities.len(), ACTIVITY_COLUMNS);
        assert!(activities.contains(&"total_freefall_time".to_string()));

        let rows = ctx
            .gateway
            .execute("SELECT jump_number, total_freefall_time FROM activities", &[])
            .await
            .unwrap();
        let row = rows.first().unwrap();
        assert_eq!(row.get_i64("jump_number").unwrap(), Some(200));
        assert_eq!(row.get_i64("total_freefall_time").unwrap(), None);
    }

    #[test_context(SchemaTestContext)]
    #[tokio::test]
    async fn test_unexpected_failure_is_fatal(ctx: &mut SchemaTestContext) {
        ctx.gateway
            .execute("CREATE VIEW users AS SELECT 1 AS id", &[])
            .await
            .unwrap();

        match initialize(&ctx.gateway).await {
            Err(GatewayError::Schema { step, source }) => {
                assert_eq!(step, "add_users_phone_number");
                assert!(!source.is_already_exists());
            }
            other => panic!("expected a fatal schema error, got {:?}", other),
        }
    }
}
