#[cfg(test)]
mod tests {
    use sportlog::db::dialect::{
        classify, has_returning, numbered_placeholders, plan, split_returning, Dispatch, Engine, Mode, StatementKind,
    };

    #[test]
    fn test_placeholders_are_numbered() {
        assert_eq!(
            numbered_placeholders("SELECT * FROM activities WHERE user_id = $1 AND sport_type = $2"),
            "SELECT * FROM activities WHERE user_id = ?1 AND sport_type = ?2"
        );
    }

    #[test]
    fn test_placeholders_keep_order_and_repeats() {
        assert_eq!(
            numbered_placeholders("UPDATE t SET a = $2, b = $1 WHERE c = $2 OR d = $10"),
            "UPDATE t SET a = ?2, b = ?1 WHERE c = ?2 OR d = ?10"
        );
    }

    #[test]
    fn test_placeholders_skip_literals_and_comments() {
        let statement = "SELECT '$1 each', \"col$2\" FROM t WHERE a = $1 -- costs $3\nAND b = $2";
        assert_eq!(
            numbered_placeholders(statement),
            "SELECT '$1 each', \"col$2\" FROM t WHERE a = ?1 -- costs $3\nAND b = ?2"
        );
    }

    #[test]
    fn test_lone_dollar_sign_is_kept() {
        assert_eq!(numbered_placeholders("SELECT $ FROM t WHERE a = $1"), "SELECT $ FROM t WHERE a = ?1");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("SELECT 1"), StatementKind::Read);
        assert_eq!(classify("  select * from users"), StatementKind::Read);
        assert_eq!(classify("-- leading comment\nSELECT 1"), StatementKind::Read);
        assert_eq!(classify("WITH x AS (SELECT 1) SELECT * FROM x"), StatementKind::Read);
        assert_eq!(classify("PRAGMA table_info(users)"), StatementKind::Read);
        assert_eq!(classify("INSERT INTO t (a) VALUES ($1)"), StatementKind::Write);
        assert_eq!(classify("UPDATE t SET a = 1"), StatementKind::Write);
        assert_eq!(classify("DELETE FROM t"), StatementKind::Write);
        assert_eq!(classify("CREATE TABLE IF NOT EXISTS t (id INTEGER)"), StatementKind::Write);
    }

    #[test]
    fn test_classify_common_table_expressions_by_main_verb() {
        assert_eq!(
            classify("WITH old AS (SELECT id FROM t WHERE a < $1) DELETE FROM t WHERE id IN (SELECT id FROM old)"),
            StatementKind::Write
        );
        assert_eq!(
            classify("with recent(id) as (select id from t) update t set a = 1 where id in (select id from recent)"),
            StatementKind::Write
        );
        assert_eq!(
            classify("WITH deleted AS (SELECT 'DELETE' AS verb) SELECT * FROM deleted"),
            StatementKind::Read
        );

        let dispatch = plan(Engine::Postgres, "WITH x AS (SELECT 1) DELETE FROM t WHERE id IN (SELECT * FROM x)");
        assert_eq!(dispatch.mode, Mode::Execute);
        let dispatch = plan(Engine::Sqlite, "WITH x AS (SELECT $1) DELETE FROM t WHERE id IN (SELECT * FROM x)");
        assert_eq!(dispatch.mode, Mode::Execute);
    }

    #[test]
    fn test_split_returning() {
        assert_eq!(
            split_returning("INSERT INTO t (a) VALUES ($1) RETURNING id"),
            Some(("INSERT INTO t (a) VALUES ($1)".to_string(), "id".to_string()))
        );
        assert_eq!(
            split_returning("INSERT INTO t (a) VALUES ($1)\nreturning user_id;"),
            Some(("INSERT INTO t (a) VALUES ($1)".to_string(), "user_id".to_string()))
        );
        assert_eq!(split_returning("INSERT INTO t (a) VALUES ($1) RETURNING *"), None);
        assert_eq!(split_returning("INSERT INTO t (a) VALUES ('RETURNING id')"), None);
        assert_eq!(split_returning("INSERT INTO t (a) VALUES ($1)"), None);
    }

    #[test]
    fn test_has_returning_ignores_identifiers() {
        assert!(has_returning("INSERT INTO t (a) VALUES (1) RETURNING id"));
        assert!(!has_returning("INSERT INTO t (returning_id) VALUES (1)"));
        assert!(!has_returning("INSERT INTO t (a) VALUES ('returning id')"));
    }

    #[test]
    fn test_plan_sqlite_insert_returning() {
        let dispatch = plan(Engine::Sqlite, "INSERT INTO t (a, b) VALUES ($1, $2) RETURNING id");
        assert_eq!(
            dispatch,
            Dispatch {
                sql: "INSERT INTO t (a, b) VALUES (?1, ?2)".to_string(),
                mode: Mode::ExecuteReturningKey("id".to_string()),
            }
        );
    }

    #[test]
    fn test_plan_sqlite_read_and_write() {
        let read = plan(Engine::Sqlite, "SELECT * FROM t WHERE id = $1");
        assert_eq!(read.sql, "SELECT * FROM t WHERE id = ?1");
        assert_eq!(read.mode, Mode::Rows);

        let write = plan(Engine::Sqlite, "DELETE FROM t WHERE id = $1");
        assert_eq!(write.sql, "DELETE FROM t WHERE id = ?1");
        assert_eq!(write.mode, Mode::Execute);
    }

    #[test]
    fn test_plan_postgres_keeps_statement() {
        let statement = "INSERT INTO t (a) VALUES ($1) RETURNING id";
        let dispatch = plan(Engine::Postgres, statement);
        assert_eq!(dispatch.sql, statement);
        assert_eq!(dispatch.mode, Mode::Rows);

        let update = plan(Engine::Postgres, "UPDATE t SET a = $1");
        assert_eq!(update.mode, Mode::Execute);
    }

    #[test]
    fn test_engine_parsing_and_types() {
        assert_eq!("sqlite".parse::<Engine>(), Ok(Engine::Sqlite));
        assert_eq!("PostgreSQL".parse::<Engine>(), Ok(Engine::Postgres));
        assert_eq!("pg".parse::<Engine>(), Ok(Engine::Postgres));
        assert!("mysql".parse::<Engine>().is_err());

        assert_eq!(Engine::Sqlite.id_column(), "INTEGER PRIMARY KEY AUTOINCREMENT");
        assert_eq!(Engine::Postgres.id_column(), "SERIAL PRIMARY KEY");
        assert_eq!(Engine::Postgres.real_type(), "DOUBLE PRECISION");
    }
}
