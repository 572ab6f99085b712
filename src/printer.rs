// The external printer stub (§1, §6). Stateless: it echoes the caller's
// timestamp unchanged and performs no ordering of its own. Kept in the
// library (not just the `printer` binary) so the test suite can drive a
// real instance over real loopback TCP instead of mocking it.

use std::{sync::Arc, time::Duration};

use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use crate::{
    message::{PrintJob, PrintReply},
    net::{read_frame, write_frame},
};

/// Runs the printer accept loop. `delay` is an artificial processing delay
/// before replying, making overlapping requests observable; `observer` is
/// called with every job right before the reply is sent, which is how tests
/// capture the printer-observed order.
pub async fn serve(
    listener: TcpListener,
    delay: Duration,
    observer: impl Fn(&PrintJob) + Send + Sync + 'static,
) -> anyhow::Result<()> {
    let observer = Arc::new(observer);
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let observer = observer.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_job(stream, delay, observer.as_ref()).await {
                warn!(%peer_addr, %err, "printer connection failed");
            }
        });
    }
}

async fn handle_job(
    mut stream: TcpStream,
    delay: Duration,
    observer: &(impl Fn(&PrintJob) + Send + Sync),
) -> anyhow::Result<()> {
    let job: PrintJob = read_frame(&mut stream).await?;
    info!(
        client_id = job.client_id,
        lamport_ts = job.lamport_ts,
        content = %job.content,
        "printing"
    );
    observer(&job);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let reply = PrintReply {
        success: true,
        confirmation: format!("printed for client {}", job.client_id),
        // The printer echoes the request's timestamp unchanged; it keeps no
        // clock of its own (§3, §6, §9).
        lamport_ts: job.lamport_ts,
    };
    write_frame(&mut stream, &reply).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test]
    async fn echoes_timestamp_unchanged() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Duration::ZERO, |_| {}));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        write_frame(
            &mut stream,
            &PrintJob {
                client_id: 9,
                content: "hello".into(),
                lamport_ts: 42,
            },
        )
        .await
        .unwrap();
        let reply: PrintReply = read_frame(&mut stream).await.unwrap();
        assert!(reply.success);
        assert_eq!(reply.lamport_ts, 42);
    }

    #[tokio::test]
    async fn observer_sees_every_job() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        tokio::spawn(serve(listener, Duration::ZERO, move |job| {
            seen_clone.lock().unwrap().push(job.lamport_ts);
        }));

        for ts in [1, 2, 3] {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            write_frame(
                &mut stream,
                &PrintJob {
                    client_id: 1,
                    content: "m".into(),
                    lamport_ts: ts,
                },
            )
            .await
            .unwrap();
            let _reply: PrintReply = read_frame(&mut stream).await.unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
}
