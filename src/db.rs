use crate::config::Config;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;
use std::time::Duration;

const IN_MEMORY: &str = ":memory:";

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

pub struct Database {
    db: LibsqlDatabase,
    conn: Connection,
    replica: bool,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn is_replica(&self) -> bool {
        self.replica
    }

    pub async fn sync(&self) -> Result<()> {
        if self.replica {
            self.db
                .sync()
                .await
                .map_err(|e| anyhow::anyhow!("sync failed: {}", e))?;
        }
        Ok(())
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    /// Opens the database named in the config. Relative paths resolve against `data_dir`;
    /// `:memory:` opens a private in-memory database.
    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let name = cfg.app.get_db();

        let (db, replica) = match cfg.app.replica() {
            Some((url, token)) if name != IN_MEMORY => {
                tracing::info!("[db] running in synced database mode (offline writes)");
                let sync_interval = Duration::from_secs(cfg.app.sync_interval_seconds);
                let db = Builder::new_synced_database(data_dir.join(name), url.to_string(), token.to_string())
                    .sync_interval(sync_interval)
                    .build()
                    .await?;
                (db, true)
            }
            _ if name == IN_MEMORY => (Builder::new_local(IN_MEMORY).build().await?, false),
            _ => (Builder::new_local(data_dir.join(name)).build().await?, false),
        };

        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;

        for (filename, sql) in SYSTEM_MIGRATIONS {
            Self::run_migration(&conn, filename, sql).await?;
        }

        for (filename, sql) in crate::bookmarks::migrations() {
            Self::run_migration(&conn, filename, sql).await?;
        }

        Ok(Database { db, conn, replica })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> Config {
        Config::from_yaml_str("app:\n  database: \":memory:\"\n  port: 0\n  api_token: t\n").unwrap()
    }

    #[tokio::test]
    async fn test_migrations_are_recorded_once() {
        let db = Database::new(&memory_config(), Path::new(".")).await.unwrap();
        let conn = db.connection();

        // a second pass must be a no-op
        for (filename, sql) in crate::bookmarks::migrations() {
            Database::run_migration(conn, filename, sql).await.unwrap();
        }

        let mut rows = conn.query("SELECT COUNT(*) FROM _migrations", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let count: i64 = row.get(0).unwrap();
        assert_eq!(count as usize, SYSTEM_MIGRATIONS.len() + crate::bookmarks::migrations().len());
        assert!(!db.is_replica());
        db.sync().await.unwrap();
    }
}
