// Outbound printer RPC: `SendToPrinter` (§6).

use std::{net::SocketAddr, time::Duration};

use tokio::{net::TcpStream, time::timeout};

use crate::{
    message::{PrintJob, PrintReply},
    net::{read_frame, write_frame},
};

#[derive(Debug, Clone)]
pub struct PrinterClient {
    pub addr: SocketAddr,
    pub rpc_timeout: Duration,
}

impl PrinterClient {
    pub fn new(addr: SocketAddr, rpc_timeout: Duration) -> Self {
        Self { addr, rpc_timeout }
    }

    pub async fn send(&self, job: PrintJob) -> anyhow::Result<PrintReply> {
        let addr = self.addr;
        let call = async move {
            let mut stream = TcpStream::connect(addr).await?;
            write_frame(&mut stream, &job).await?;
            read_frame(&mut stream).await
        };
        timeout(self.rpc_timeout, call).await?
    }
}
