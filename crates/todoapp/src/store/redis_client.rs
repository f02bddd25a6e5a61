//! [`HashClient`] over a Redis server.
//!
//! One connection is opened on first use and reused. A command that fails
//! at the I/O level drops it, and the next command reconnects.

use super::hash_client::{HashClient, RemoteError};
use parking_lot::Mutex;
use redis::{Client, Commands, Connection, RedisError, RedisResult};
use std::collections::HashMap;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const IO_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RedisHashClient {
    client: Client,
    url: String,
    conn: Mutex<Option<Connection>>,
}

impl RedisHashClient {
    /// Parse `url` (`redis://host:port/db`). Does not connect.
    pub fn open(url: &str) -> Result<Self, RemoteError> {
        let client = Client::open(url).map_err(|e| remote_error("OPEN", e))?;
        Ok(Self {
            client,
            url: url.to_string(),
            conn: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn connect(&self) -> RedisResult<Connection> {
        tracing::debug!(url = %self.url, "connecting to redis");
        let conn = self.client.get_connection_with_timeout(CONNECT_TIMEOUT)?;
        conn.set_read_timeout(Some(IO_TIMEOUT))?;
        conn.set_write_timeout(Some(IO_TIMEOUT))?;
        Ok(conn)
    }

    fn run<T>(
        &self,
        command: &'static str,
        f: impl FnOnce(&mut Connection) -> RedisResult<T>,
    ) -> Result<T, RemoteError> {
        let mut slot = self.conn.lock();
        let mut conn = match slot.take() {
            Some(conn) => conn,
            None => self.connect().map_err(|e| remote_error(command, e))?,
        };

        match f(&mut conn) {
            Ok(value) => {
                *slot = Some(conn);
                Ok(value)
            }
            Err(e) => {
                if !(e.is_io_error() || e.is_connection_dropped() || e.is_timeout()) {
                    *slot = Some(conn);
                }
                Err(remote_error(command, e))
            }
        }
    }
}

fn remote_error(command: &'static str, err: RedisError) -> RemoteError {
    RemoteError::new(command, err.to_string())
}

impl HashClient for RedisHashClient {
    fn hset(&self, key: &str, fields: &[(&str, &str)]) -> Result<(), RemoteError> {
        self.run("HSET", |conn| {
            redis::cmd("HSET").arg(key).arg(fields).query::<()>(conn)
        })
    }

    fn hgetall(&self, key: &str) -> Result<HashMap<String, String>, RemoteError> {
        self.run("HGETALL", |conn| conn.hgetall(key))
    }

    fn keys(&self, pattern: &str) -> Result<Vec<String>, RemoteError> {
        self.run("KEYS", |conn| conn.keys(pattern))
    }

    fn del(&self, key: &str) -> Result<bool, RemoteError> {
        self.run("DEL", |conn| conn.del::<_, i64>(key)).map(|n| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_rejects_bad_url() {
        let err = RedisHashClient::open("not a url").err().unwrap();
        assert_eq!(err.command, "OPEN");
    }

    #[test]
    fn test_open_does_not_connect() {
        let client = RedisHashClient::open("redis://127.0.0.1:1").unwrap();
        assert_eq!(client.url(), "redis://127.0.0.1:1");
    }

    #[test]
    fn test_refused_connection_is_remote_error() {
        let client = RedisHashClient::open("redis://127.0.0.1:1").unwrap();
        let err = client.keys("todo:*").unwrap_err();
        assert_eq!(err.command, "KEYS");

        // Still failing, and still reporting the command that failed.
        let err = client.hgetall("todo:1").unwrap_err();
        assert_eq!(err.command, "HGETALL");
    }
}
