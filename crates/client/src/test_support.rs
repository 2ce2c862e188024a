// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted single-connection server for session tests.
//!
//! Each exchange reads the exact bytes a command should produce,
//! asserts them, and writes the scripted reply. The connection is
//! dropped once the script runs out, so an exchange with an empty
//! reply doubles as a mid-command connection kill.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub(crate) struct Exchange {
    pub expect: &'static [u8],
    pub reply: Vec<u8>,
}

pub(crate) fn exchange(expect: &'static [u8], reply: &[u8]) -> Exchange {
    Exchange { expect, reply: reply.to_vec() }
}

pub(crate) struct ScriptServer {
    pub port: u16,
    handle: JoinHandle<()>,
}

impl ScriptServer {
    /// Bind on an ephemeral port and serve one connection through the
    /// script, then drop it.
    pub async fn start(script: Vec<Exchange>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut conn, _) = listener.accept().await.unwrap();
            for step in script {
                let mut buf = vec![0u8; step.expect.len()];
                conn.read_exact(&mut buf).await.unwrap();
                assert_eq!(
                    buf,
                    step.expect,
                    "unexpected command bytes: got {:?}, want {:?}",
                    String::from_utf8_lossy(&buf),
                    String::from_utf8_lossy(step.expect),
                );
                if !step.reply.is_empty() {
                    conn.write_all(&step.reply).await.unwrap();
                }
            }
        });
        Self { port, handle }
    }

    /// Propagate any assertion failure from the server task.
    pub async fn finish(self) {
        self.handle.await.unwrap();
    }
}
