// Length-prefixed `bincode` framing over an async byte stream: a fixed-width
// length prefix ahead of the payload, one frame per logical RPC call.

use bincode::Options;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Frames larger than this are rejected; no message in this protocol is
/// anywhere close to this size, so hitting it means a corrupt stream.
pub const MAX_FRAME_LEN: usize = 1 << 20;

pub async fn write_frame<T>(stream: &mut (impl AsyncWrite + Unpin), value: &T) -> anyhow::Result<()>
where
    T: Serialize,
{
    let buf = bincode::options().serialize(value)?;
    anyhow::ensure!(buf.len() <= MAX_FRAME_LEN, "outgoing frame too large");
    stream.write_u32(buf.len() as u32).await?;
    stream.write_all(&buf).await?;
    stream.flush().await?;
    Ok(())
}

pub async fn read_frame<T>(stream: &mut (impl AsyncRead + Unpin)) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let len = stream.read_u32().await? as usize;
    anyhow::ensure!(len <= MAX_FRAME_LEN, "incoming frame too large");
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).await?;
    Ok(bincode::options().deserialize(&buf)?)
}
