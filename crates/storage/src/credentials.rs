use std::fmt;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

const DEFAULT_PORT: u16 = 5432;

/// Connection details for the category database.
///
/// The field names match the JSON document stored in the secret vault, so the
/// secret string deserializes directly. Extra keys such as `engine` are ignored.
#[derive(Clone, Deserialize)]
pub struct DatabaseCredentials {
    pub host: String,
    pub username: String,
    pub password: String,
    pub dbname: String,
    #[serde(default)]
    pub port: Option<u16>,
}

impl DatabaseCredentials {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port())
            .username(&self.username)
            .password(&self.password)
            .database(&self.dbname)
    }

    /// `host:port/dbname`, safe to log.
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port(), self.dbname)
    }
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"********")
            .field("dbname", &self.dbname)
            .field("port", &self.port)
            .finish()
    }
}
