pub mod mysql;
pub mod postgres;
pub mod selector;

/// Engine grouping that decides which client tools and flags are used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterFamily {
    MySql,
    Postgres,
}

/// Connection parameters for one environment, as read from the database config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub adapter: String,
    pub host: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub socket: Option<String>,
    pub database: Option<String>,
}

impl ConnectionProfile {
    pub fn is_mysql_family(&self) -> bool {
        self.adapter.starts_with("mysql")
    }

    pub fn is_postgres_family(&self) -> bool {
        matches!(self.adapter.as_str(), "postgresql" | "pg" | "postgis")
    }

    pub fn family(&self) -> Option<AdapterFamily> {
        if self.is_mysql_family() {
            Some(AdapterFamily::MySql)
        } else if self.is_postgres_family() {
            Some(AdapterFamily::Postgres)
        } else {
            None
        }
    }

    /// Mask the password in the `-p'...'` and `PGPASSWORD='...'` tokens of a command line.
    pub fn redact(&self, text: &str) -> String {
        match self.password.as_deref() {
            Some(pw) if !pw.is_empty() => text
                .replace(&format!("-p'{}'", pw), "-p'******'")
                .replace(&format!("PGPASSWORD='{}'", pw), "PGPASSWORD='******'"),
            _ => text.to_string(),
        }
    }
}

/// What to leave out of (or restrict) a dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Tables skipped entirely, structure and data.
    pub exclude_tables: Vec<String>,
    /// Tables whose structure is kept but whose rows are skipped (PostgreSQL only).
    pub exclude_data_tables: Vec<String>,
    /// Schemas to dump and restore (PostgreSQL only). Empty means all of them.
    pub schemas: Vec<String>,
}

/// Builds the shell command text for one adapter family.
///
/// Every command that reaches a shell is assembled here. Values from configuration are
/// interpolated as-is; only the MySQL password is single-quoted. Database, table and schema
/// names containing shell metacharacters are passed through unescaped.
pub trait BackendDriver: Send + Sync {
    fn name(&self) -> &'static str;

    fn family(&self) -> AdapterFamily;

    fn profile(&self) -> &ConnectionProfile;

    /// Credential flags appended to every client invocation.
    fn credentials(&self) -> String;

    fn dump_options(&self, opts: &DumpOptions) -> String;

    /// Command that writes the SQL dump to stdout.
    fn dump_command(&self, opts: &DumpOptions) -> String;

    /// Command that loads the already decompressed `file` into the database.
    fn restore_command(&self, file: &str, opts: &DumpOptions) -> String;
}
