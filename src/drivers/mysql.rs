

use super::{AdapterFamily, BackendDriver, ConnectionProfile, DumpOptions};

pub struct MySqlDriver {
    profile: ConnectionProfile,
    database: String,
}

impl MySqlDriver {
    pub fn new(profile: ConnectionProfile, database: String) -> Self {
        Self { profile, database }
    }

    fn ignore_tables_opts(&self, opts: &DumpOptions) -> String {
        opts.exclude_tables
            .iter()
            .map(|t| format!("--ignore-table={}.{}", self.database, t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BackendDriver for MySqlDriver {
    fn name(&self) -> &'static str { "mysql" }

    fn family(&self) -> AdapterFamily { AdapterFamily::MySql }

    fn profile(&self) -> &ConnectionProfile { &self.profile }

    fn credentials(&self) -> String {
        let p = &self.profile;
        let mut params = String::new();
        if let Some(user) = &p.username {
            params.push_str(&format!(" -u {} ", user));
        }
        if let Some(password) = &p.password {
            params.push_str(&format!(" -p'{}' ", password));
        }
        if let Some(host) = &p.host {
            params.push_str(&format!(" -h {} ", host));
        }
        if let Some(socket) = &p.socket {
            params.push_str(&format!(" -S {} ", socket));
        }
        if let Some(port) = &p.port {
            params.push_str(&format!(" -P {} ", port));
        }
        params
    }

    // Data-only exclusion has no mysqldump equivalent; those tables are dumped in full.
    fn dump_options(&self, opts: &DumpOptions) -> String {
        format!("--lock-tables=false {} ", self.ignore_tables_opts(opts))
    }

    fn dump_command(&self, opts: &DumpOptions) -> String {
        format!("mysqldump {} {} {}", self.credentials(), self.database, self.dump_options(opts))
    }

    fn restore_command(&self, file: &str, _opts: &DumpOptions) -> String {
        format!("mysql {} -D {} < {}", self.credentials(), self.database, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver(profile: ConnectionProfile) -> MySqlDriver {
        MySqlDriver::new(profile, "shop".into())
    }

    #[test]
    fn username_only_yields_single_flag() {
        let d = driver(ConnectionProfile {
            adapter: "mysql2".into(),
            username: Some("bob".into()),
            ..Default::default()
        });
        assert_eq!(d.credentials(), " -u bob ");
    }

    #[test]
    fn credentials_keep_flag_order() {
        let d = driver(ConnectionProfile {
            adapter: "mysql2".into(),
            port: Some("3307".into()),
            socket: Some("/tmp/mysql.sock".into()),
            host: Some("db.internal".into()),
            password: Some("s3cret".into()),
            username: Some("bob".into()),
            database: Some("shop".into()),
        });
        assert_eq!(
            d.credentials(),
            " -u bob  -p's3cret'  -h db.internal  -S /tmp/mysql.sock  -P 3307 "
        );
    }

    #[test]
    fn dump_ignores_tables_but_not_data_only_tables() {
        let d = driver(ConnectionProfile { adapter: "mysql".into(), ..Default::default() });
        let opts = DumpOptions {
            exclude_tables: vec!["sessions".into(), "logs".into()],
            exclude_data_tables: vec!["events".into()],
            schemas: vec![],
        };
        assert_eq!(
            d.dump_command(&opts),
            "mysqldump  shop --lock-tables=false --ignore-table=shop.sessions --ignore-table=shop.logs "
        );
        assert!(!d.dump_options(&opts).contains("events"));
    }

    #[test]
    fn restore_reads_file_into_database() {
        let d = driver(ConnectionProfile {
            adapter: "mysql2".into(),
            username: Some("root".into()),
            ..Default::default()
        });
        assert_eq!(
            d.restore_command("db/shop.sql", &DumpOptions::default()),
            "mysql  -u root  -D shop < db/shop.sql"
        );
    }
}
