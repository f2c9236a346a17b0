use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::{
    DatabaseError, DatabaseResult, DocumentDatabase, InFileDatabase, InMemoryDatabase,
    InvoiceDatabase, SqlDatabase,
};

/// Which storage backend serves the invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseKind {
    #[default]
    InMemory,
    InFile,
    InSql,
    InDocument,
}

impl DatabaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DatabaseKind::InMemory => "in-memory",
            DatabaseKind::InFile => "in-file",
            DatabaseKind::InSql => "in-sql",
            DatabaseKind::InDocument => "in-document",
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatabaseKind {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "in-memory" => Ok(DatabaseKind::InMemory),
            "in-file" => Ok(DatabaseKind::InFile),
            "in-sql" => Ok(DatabaseKind::InSql),
            "in-document" => Ok(DatabaseKind::InDocument),
            other => Err(DatabaseError::InvalidArgument(format!(
                "unknown database `{other}` (expected in-memory, in-file, in-sql or in-document)"
            ))),
        }
    }
}

/// Backend selection plus the location settings each backend needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub kind: DatabaseKind,
    /// Used by [`DatabaseKind::InFile`].
    pub file_path: PathBuf,
    /// sqlx connection URL, used by the sql and document backends.
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::InMemory,
            file_path: PathBuf::from("data/invoices.jsonl"),
            url: "sqlite://data/invoices.db?mode=rwc".to_string(),
        }
    }
}

/// Build the configured backend.
pub async fn open_database(config: &DatabaseConfig) -> DatabaseResult<Arc<dyn InvoiceDatabase>> {
    tracing::info!(database = %config.kind, "opening invoice database");
    let database: Arc<dyn InvoiceDatabase> = match config.kind {
        DatabaseKind::InMemory => Arc::new(InMemoryDatabase::new()),
        DatabaseKind::InFile => Arc::new(InFileDatabase::open(&config.file_path).await?),
        DatabaseKind::InSql => {
            ensure_sqlite_parent(&config.url).await?;
            Arc::new(SqlDatabase::connect(&config.url).await?)
        }
        DatabaseKind::InDocument => {
            ensure_sqlite_parent(&config.url).await?;
            Arc::new(DocumentDatabase::connect(&config.url).await?)
        }
    };
    Ok(database)
}

/// sqlite creates the database file but not the directory holding it.
async fn ensure_sqlite_parent(url: &str) -> DatabaseResult<()> {
    let Some(path) = sqlite_file(url) else {
        return Ok(());
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

fn sqlite_file(url: &str) -> Option<&Path> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::contract;

    #[test]
    fn parses_backend_keys() {
        for kind in [
            DatabaseKind::InMemory,
            DatabaseKind::InFile,
            DatabaseKind::InSql,
            DatabaseKind::InDocument,
        ] {
            assert_eq!(kind.as_str().parse::<DatabaseKind>().unwrap(), kind);
        }
        assert!(matches!(
            "hibernate".parse::<DatabaseKind>(),
            Err(DatabaseError::InvalidArgument(_))
        ));
    }

    #[test]
    fn extracts_sqlite_file_from_url() {
        assert_eq!(
            sqlite_file("sqlite://data/invoices.db?mode=rwc"),
            Some(Path::new("data/invoices.db"))
        );
        assert_eq!(sqlite_file("sqlite::memory:"), None);
        assert_eq!(sqlite_file("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn opens_every_backend() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("nested/invoices.db").display()
        );

        for kind in [
            DatabaseKind::InMemory,
            DatabaseKind::InFile,
            DatabaseKind::InSql,
            DatabaseKind::InDocument,
        ] {
            let config = DatabaseConfig {
                kind,
                file_path: dir.path().join(format!("{kind}.jsonl")),
                url: url.clone(),
            };
            let db = open_database(&config).await.unwrap();
            let id = db.save(contract::invoice(kind.as_str())).await.unwrap();
            let stored = db.get_by_id(id).await.unwrap().unwrap();
            assert_eq!(stored.invoice_number(), kind.as_str(), "backend {kind}");
        }
    }
}
