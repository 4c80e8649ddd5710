//! The built-in stdin/stdout transport: every line typed locally
//! arrives as a public message on `#console`, and replies are
//! printed with their target. Mostly useful for trying plugins out
//! without a real chat network.

use std::sync::Arc;

use {
    async_trait::async_trait,
    tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin},
};

use {
    burrow_client::{Connection, Inbound, Transport},
    burrow_common::{ReplySink, Result},
};

/// Channel name local input arrives on.
const CONSOLE_TARGET: &str = "#console";
/// Source identity stamped on local input.
const CONSOLE_SOURCE: &str = "local!user";

pub struct ConsoleTransport;

impl ConsoleTransport {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    async fn connect(&self) -> Result<(Box<dyn Connection>, Arc<dyn ReplySink>)> {
        let lines = BufReader::new(tokio::io::stdin()).lines();
        Ok((
            Box::new(ConsoleConnection { lines }),
            Arc::new(ConsoleSink),
        ))
    }
}

struct ConsoleConnection {
    lines: Lines<BufReader<Stdin>>,
}

#[async_trait]
impl Connection for ConsoleConnection {
    async fn next_event(&mut self) -> Result<Option<Inbound>> {
        let Some(line) = self.lines.next_line().await? else {
            return Ok(None);
        };
        Ok(Some(Inbound {
            body: line,
            source: CONSOLE_SOURCE.to_owned(),
            target: CONSOLE_TARGET.to_owned(),
            private: false,
        }))
    }
}

struct ConsoleSink;

#[async_trait]
impl ReplySink for ConsoleSink {
    async fn send(&self, target: &str, line: &str) -> Result<()> {
        let mut out = tokio::io::stdout();
        out.write_all(format!("[{target}] {line}\n").as_bytes())
            .await?;
        out.flush().await?;
        Ok(())
    }
}
