//! JSON lines tool host for an out-of-process dialogue engine.
//!
//! Each request line yields exactly one response line. Malformed lines get an
//! `error` response and the loop keeps reading.

use crate::session::AssistantSession;
use friday_rs_protocol::{HostRequest, HostResponse};
use log::{debug, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Serve requests from `reader` until end of input, writing responses to `writer`.
pub async fn serve<R, W>(
    session: &AssistantSession,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("stdio host started");
    let mut buf = Vec::new();
    let mut handled = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(session, line.trim_end_matches(['\n', '\r'])).await,
            Err(err) => {
                warn!("non utf-8 host request (len={}): {}", buf.len(), err);
                HostResponse::Error {
                    message: format!("invalid request: {err}"),
                }
            }
        };
        let mut encoded = serde_json::to_string(&response)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        encoded.push('\n');
        writer.write_all(encoded.as_bytes()).await?;
        writer.flush().await?;
        handled += 1;
    }
    info!("stdio host finished (requests={})", handled);
    Ok(())
}

/// Decode one request line and produce its response.
pub async fn handle_line(session: &AssistantSession, line: &str) -> HostResponse {
    let request = match serde_json::from_str::<HostRequest>(line) {
        Ok(request) => request,
        Err(err) => {
            warn!("malformed host request (len={}): {}", line.len(), err);
            return HostResponse::Error {
                message: format!("invalid request: {err}"),
            };
        }
    };
    match request {
        HostRequest::Invoke {
            id,
            name,
            arguments,
        } => {
            debug!("host invoke (name={}, id={:?})", name, id);
            let output = session.invoke(&name, arguments).await;
            HostResponse::Result { id, output }
        }
        HostRequest::RecordTurn { user, assistant } => {
            session.record_turn(&user, &assistant);
            HostResponse::Recorded
        }
        HostRequest::ListTools => HostResponse::Tools {
            tools: session.descriptors(),
        },
    }
}
