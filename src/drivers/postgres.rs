

use super::{AdapterFamily, BackendDriver, ConnectionProfile, DumpOptions};

pub struct PostgresDriver {
    profile: ConnectionProfile,
    database: String,
}

impl PostgresDriver {
    pub fn new(profile: ConnectionProfile, database: String) -> Self {
        Self { profile, database }
    }

    /// `PGPASSWORD=` assignment prefixed to every client call, empty without a password.
    fn pgpass(&self) -> String {
        match &self.profile.password {
            Some(password) => format!("PGPASSWORD='{}'", password),
            None => String::new(),
        }
    }

    fn terminate_connections_sql(&self) -> String {
        format!(
            "SELECT pg_terminate_backend(pg_stat_activity.pid) FROM pg_stat_activity WHERE pg_stat_activity.datname = '{}' AND pid <> pg_backend_pid();",
            self.database
        )
    }
}

impl BackendDriver for PostgresDriver {
    fn name(&self) -> &'static str { "postgres" }

    fn family(&self) -> AdapterFamily { AdapterFamily::Postgres }

    fn profile(&self) -> &ConnectionProfile { &self.profile }

    fn credentials(&self) -> String {
        let p = &self.profile;
        let mut params = String::new();
        if let Some(user) = &p.username {
            params.push_str(&format!(" -U {} ", user));
        }
        if let Some(host) = &p.host {
            params.push_str(&format!(" -h {} ", host));
        }
        if let Some(port) = &p.port {
            params.push_str(&format!(" -p {} ", port));
        }
        params
    }

    fn dump_options(&self, opts: &DumpOptions) -> String {
        let ignore = opts.exclude_tables
            .iter()
            .map(|t| format!("--exclude-table={}", t))
            .collect::<Vec<_>>()
            .join(" ");
        let ignore_data = opts.exclude_data_tables
            .iter()
            .map(|t| format!("--exclude-table-data={}", t))
            .collect::<Vec<_>>()
            .join(" ");
        let mut options = format!("--no-acl --no-owner {} {}", ignore, ignore_data);
        for schema in &opts.schemas {
            options.push_str(&format!(" -n {}", schema));
        }
        options
    }

    fn dump_command(&self, opts: &DumpOptions) -> String {
        format!(
            "{} pg_dump {} {} {}",
            self.pgpass(),
            self.credentials(),
            self.database,
            self.dump_options(opts)
        )
    }

    fn restore_command(&self, file: &str, opts: &DumpOptions) -> String {
        let pgpass = self.pgpass();
        let creds = self.credentials();
        let db = &self.database;
        let terminate = self.terminate_connections_sql();

        if opts.schemas.is_empty() {
            // full replace: kick everyone off, recreate the database, load
            format!(
                "{pgpass} psql -c \"{terminate};\" {creds}; \
                 {pgpass} dropdb {creds} {db}; \
                 {pgpass} createdb {creds} {db}; \
                 {pgpass} psql {creds} -d {db} < {file}"
            )
        } else {
            let reset_schemas = opts.schemas
                .iter()
                .map(|s| format!("DROP SCHEMA IF EXISTS {s} CASCADE; CREATE SCHEMA {s};"))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "{pgpass} psql -v ON_ERROR_STOP=1 -d {db} {creds} -c \"{terminate} {reset_schemas}\"; \
                 {pgpass} psql {creds} -d {db} < {file}"
            )
        }
    }
}
