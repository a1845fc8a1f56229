//! Database resolution and query execution through DuckDB

use crate::error::{DiffstError, Result};
use crate::testcase::{SideSpec, ENV_ROOT};
use duckdb::{Connection, Statement};
use std::env;

/// Alias under which external databases are attached
const ATTACH_ALIAS: &str = "diffst_db";

/// Kind of database a logical name points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// A DuckDB database file, or `:memory:`
    DuckDb,
    /// Attached through the named DuckDB extension
    Sqlite,
    Postgres,
    MySql,
}

impl Driver {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "duckdb" => Ok(Self::DuckDb),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pq" => Ok(Self::Postgres),
            "mysql" => Ok(Self::MySql),
            _ => Err(DiffstError::config(format!(
                "Unsupported driver: {}. Use 'duckdb', 'sqlite', 'postgres' or 'mysql'",
                s
            ))),
        }
    }

    /// DuckDB extension that provides the scanner, if any
    fn extension(&self) -> Option<&'static str> {
        match self {
            Self::DuckDb => None,
            Self::Sqlite => Some("sqlite"),
            Self::Postgres => Some("postgres"),
            Self::MySql => Some("mysql"),
        }
    }
}

/// Where a logical database name resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    pub name: String,
    pub driver: Driver,
    pub url: String,
}

/// Resolve a logical database name from `_DIFFST_DB_<NAME>_DRIVER` and
/// `_DIFFST_DB_<NAME>_URL` in the process environment
pub fn resolve_database(name: &str) -> Result<DatabaseTarget> {
    resolve_database_with(name, |key| env::var(key).ok())
}

/// Resolve a logical database name using the given variable lookup
pub fn resolve_database_with<F>(name: &str, lookup: F) -> Result<DatabaseTarget>
where
    F: Fn(&str) -> Option<String>,
{
    let driver_var = format!("{}DB_{}_DRIVER", ENV_ROOT, name);
    let url_var = format!("{}DB_{}_URL", ENV_ROOT, name);

    let driver = lookup(&driver_var).ok_or_else(|| {
        DiffstError::config(format!("Driver lookup: {} not found in environment", driver_var))
    })?;
    let url = lookup(&url_var).ok_or_else(|| {
        DiffstError::config(format!(
            "DB URL lookup: {} not found in environment. Values are DB specific, e.g.\n\
             \tPostgreSQL:\tdbname=somedb user=myuser host=localhost\n\
             \tSQLite:\t\t/path/to/dbfile.db\n\
             \tMySQL:\t\thost=localhost user=root database=somedb\n\
             \tDuckDB:\t\t/path/to/file.duckdb or :memory:",
            url_var
        ))
    })?;

    Ok(DatabaseTarget {
        name: name.to_string(),
        driver: Driver::parse(&driver)?,
        url: substitute_env_vars_with(&url, &lookup)?,
    })
}

/// Expand `{NAME}` placeholders in a database URL from the environment
pub fn substitute_env_vars(url: &str) -> Result<String> {
    substitute_env_vars_with(url, &|key: &str| env::var(key).ok())
}

/// Expand `{NAME}` placeholders using `lookup`. Expanded values are not
/// rescanned, and a `{` without a closing `}` is kept as is.
fn substitute_env_vars_with<F>(url: &str, lookup: &F) -> Result<String>
where
    F: Fn(&str) -> Option<String> + ?Sized,
{
    let mut expanded = String::with_capacity(url.len());
    let mut rest = url;

    while let Some((head, tail)) = rest.split_once('{') {
        expanded.push_str(head);
        let Some((name, after)) = tail.split_once('}') else {
            expanded.push('{');
            rest = tail;
            continue;
        };
        let value = lookup(name).ok_or_else(|| {
            DiffstError::config(format!(
                "URL placeholder {{{}}} has no value; set {} in the environment or .env",
                name, name
            ))
        })?;
        expanded.push_str(&value);
        rest = after;
    }
    expanded.push_str(rest);

    Ok(expanded)
}

/// Load `.env` from the working directory or one of its parents, if present
pub fn load_env_file() -> Result<()> {
    match dotenv::dotenv() {
        Ok(path) => {
            log::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DiffstError::config(format!("Invalid .env file: {}", e))),
    }
}

/// Strip whitespace and trailing semicolons so the query can be wrapped
fn normalize_query(sql: &str) -> String {
    sql.trim().trim_end_matches(|c: char| c == ';' || c.is_whitespace()).to_string()
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// An open connection for one side together with its query
pub struct SideConnection {
    pub label: String,
    connection: Connection,
    query: String,
}

impl SideConnection {
    /// Connect to the side's database and run its setup statements
    pub fn open(label: &str, side: &SideSpec, target: &DatabaseTarget) -> Result<Self> {
        log::debug!("{} DB '{}' is {:?}: {}", label, target.name, target.driver, target.url);

        let connection = match target.driver {
            Driver::DuckDb if target.url.is_empty() || target.url == ":memory:" => {
                Connection::open_in_memory()?
            }
            Driver::DuckDb => Connection::open(&target.url)?,
            driver => {
                let connection = Connection::open_in_memory()?;
                let extension = driver.extension().unwrap_or_default();
                let attach = format!(
                    "INSTALL {ext}; LOAD {ext}; ATTACH {url} AS {alias} (TYPE {ext}, READ_ONLY); USE {alias};",
                    ext = extension,
                    url = quote_literal(&target.url),
                    alias = ATTACH_ALIAS
                );
                connection.execute_batch(&attach).map_err(|e| {
                    DiffstError::config(format!(
                        "{} DB '{}': failed to attach: {}",
                        label, target.name, e
                    ))
                })?;
                connection
            }
        };

        if let Some(setup) = side.setup.as_deref().filter(|s| !s.trim().is_empty()) {
            connection.execute_batch(setup).map_err(|e| {
                DiffstError::config(format!("{} setup SQL failed: {}", label, e))
            })?;
        }

        Ok(Self {
            label: label.to_string(),
            connection,
            query: normalize_query(&side.sql),
        })
    }

    /// Column names the query produces, in order
    pub fn describe_columns(&self) -> Result<Vec<String>> {
        let sql = format!("DESCRIBE {}", self.query);
        let mut stmt = self.connection.prepare(&sql).map_err(|e| {
            DiffstError::config(format!("{} SQL is invalid: {}", self.label, e))
        })?;

        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    /// Prepare the side's query; rows are streamed from the returned statement
    pub fn prepare(&self) -> Result<Statement<'_>> {
        Ok(self.connection.prepare(&self.query)?)
    }
}
