//! Miniature in-process work-queue server for end-to-end specs.
//!
//! Speaks just enough of the protocol for the scenarios: put,
//! reserve, reserve-with-timeout, delete, quit. Queue state lives
//! outside the listener so the server can be killed and restarted on
//! the same port without losing undelivered jobs, the way a persistent
//! server would come back after a crash.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufStream};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Default)]
struct QueueState {
    next_id: u64,
    ready: VecDeque<(u64, Vec<u8>)>,
    reserved: HashMap<u64, Vec<u8>>,
    deleted: Vec<u64>,
}

pub struct MiniServer {
    port: u16,
    state: Arc<Mutex<QueueState>>,
    listener: Option<JoinHandle<()>>,
    connections: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl MiniServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let mut server = Self {
            port,
            state: Arc::new(Mutex::new(QueueState { next_id: 1, ..Default::default() })),
            listener: None,
            connections: Arc::new(Mutex::new(Vec::new())),
        };
        server.listener = Some(server.spawn_listener(listener));
        server
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Simulate a crash: drop the listener and every live connection.
    /// Jobs reserved but not yet deleted go back to ready, as they
    /// would when reservations die with the server.
    pub async fn kill(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
            let _ = listener.await;
        }
        for conn in self.connections.lock().await.drain(..) {
            conn.abort();
            let _ = conn.await;
        }
        let mut state = self.state.lock().await;
        let requeued: Vec<_> = state.reserved.drain().collect();
        for (id, body) in requeued {
            state.ready.push_front((id, body));
        }
    }

    /// Come back up on the same port with the same queue contents.
    pub async fn restart(&mut self) {
        let addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&addr).await.unwrap();
        self.listener = Some(self.spawn_listener(listener));
    }

    /// Ids deleted over the server's whole life, across restarts.
    pub async fn deleted_ids(&self) -> Vec<u64> {
        self.state.lock().await.deleted.clone()
    }

    fn spawn_listener(&self, listener: TcpListener) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let connections = Arc::clone(&self.connections);
        tokio::spawn(async move {
            loop {
                let Ok((conn, _)) = listener.accept().await else {
                    break;
                };
                let state = Arc::clone(&state);
                let handle = tokio::spawn(async move {
                    let _ = handle_connection(conn, state).await;
                });
                connections.lock().await.push(handle);
            }
        })
    }
}

async fn handle_connection(
    conn: TcpStream,
    state: Arc<Mutex<QueueState>>,
) -> std::io::Result<()> {
    let mut stream = BufStream::new(conn);
    loop {
        let mut line = Vec::new();
        if stream.read_until(b'\n', &mut line).await? == 0 {
            return Ok(());
        }
        let text = String::from_utf8_lossy(&line);
        let tokens: Vec<&str> = text.split_ascii_whitespace().collect();
        match tokens.as_slice() {
            ["put", _pri, _delay, _ttr, n] => {
                let n: usize = n.parse().unwrap();
                let mut body = vec![0u8; n + 2];
                stream.read_exact(&mut body).await?;
                body.truncate(n);
                let id = {
                    let mut state = state.lock().await;
                    let id = state.next_id;
                    state.next_id += 1;
                    state.ready.push_back((id, body));
                    id
                };
                stream.write_all(format!("INSERTED {id}\r\n").as_bytes()).await?;
            }
            ["reserve"] => {
                let (id, body) = take_job(&state, None).await.unwrap();
                write_reserved(&mut stream, id, &body).await?;
            }
            ["reserve-with-timeout", secs] => {
                let timeout = Duration::from_secs(secs.parse().unwrap());
                match take_job(&state, Some(timeout)).await {
                    Some((id, body)) => write_reserved(&mut stream, id, &body).await?,
                    None => stream.write_all(b"TIMED_OUT\r\n").await?,
                }
            }
            ["delete", id] => {
                let id: u64 = id.parse().unwrap();
                let mut state = state.lock().await;
                let known = state.reserved.remove(&id).is_some()
                    || state.ready.iter().any(|(ready_id, _)| *ready_id == id);
                state.ready.retain(|(ready_id, _)| *ready_id != id);
                if known {
                    state.deleted.push(id);
                    stream.write_all(b"DELETED\r\n").await?;
                } else {
                    stream.write_all(b"NOT_FOUND\r\n").await?;
                }
            }
            ["quit"] => return Ok(()),
            _ => stream.write_all(b"UNKNOWN_COMMAND\r\n").await?,
        }
        stream.flush().await?;
    }
}

async fn take_job(
    state: &Arc<Mutex<QueueState>>,
    timeout: Option<Duration>,
) -> Option<(u64, Vec<u8>)> {
    let deadline = timeout.map(|t| tokio::time::Instant::now() + t);
    loop {
        {
            let mut state = state.lock().await;
            if let Some((id, body)) = state.ready.pop_front() {
                state.reserved.insert(id, body.clone());
                return Some((id, body));
            }
        }
        if let Some(deadline) = deadline {
            if tokio::time::Instant::now() >= deadline {
                return None;
            }
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

async fn write_reserved(
    stream: &mut BufStream<TcpStream>,
    id: u64,
    body: &[u8],
) -> std::io::Result<()> {
    stream.write_all(format!("RESERVED {id} {}\r\n", body.len()).as_bytes()).await?;
    stream.write_all(body).await?;
    stream.write_all(b"\r\n").await
}
