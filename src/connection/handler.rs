use actix::io::{FramedWrite, WriteHandler};
use actix::prelude::*;
use bytes::Bytes;
use log::{debug, info, warn};
use std::net::SocketAddr;
use tokio::io::{split, WriteHalf};
use tokio::net::TcpStream;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead, LinesCodec, LinesCodecError};
use uuid::Uuid;

use crate::error::ConnectionError;
use crate::models::{Connect, ConnectionId, Disconnect, Inbound, Outbound};
use crate::session::SessionManager;

/// One TCP client. Reads newline-framed lines and forwards their raw bytes
/// to the session manager, which owns text validation. Lines from the
/// manager are queued on a write buffer that drains in order as the socket
/// accepts them.
pub struct ChessConnection {
    id: ConnectionId,
    peer: SocketAddr,
    manager: Addr<SessionManager>,
    framed: FramedWrite<String, WriteHalf<TcpStream>, LinesCodec>,
    max_line_length: usize,
}

impl ChessConnection {
    pub fn serve(
        stream: TcpStream,
        peer: SocketAddr,
        manager: Addr<SessionManager>,
        max_line_length: usize,
    ) -> Addr<Self> {
        ChessConnection::create(move |ctx| {
            let (read, write) = split(stream);
            ctx.add_stream(FramedRead::new(
                read,
                AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), max_line_length),
            ));
            ChessConnection {
                id: Uuid::new_v4(),
                peer,
                manager,
                framed: FramedWrite::new(write, LinesCodec::new(), ctx),
                max_line_length,
            }
        })
    }

    fn read_error(&self, err: AnyDelimiterCodecError) -> ConnectionError {
        match err {
            AnyDelimiterCodecError::MaxChunkLengthExceeded => ConnectionError::LineTooLong(self.max_line_length),
            AnyDelimiterCodecError::Io(e) => ConnectionError::Io(e),
        }
    }

    fn write_error(&self, err: LinesCodecError) -> ConnectionError {
        match err {
            LinesCodecError::MaxLineLengthExceeded => ConnectionError::LineTooLong(self.max_line_length),
            LinesCodecError::Io(e) => ConnectionError::Io(e),
        }
    }
}

impl Actor for ChessConnection {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!("Connection {} opened from {}", self.id, self.peer);
        self.manager.do_send(Connect {
            id: self.id,
            peer: self.peer.to_string(),
            outbound: ctx.address().recipient(),
        });
    }

    fn stopping(&mut self, _: &mut Self::Context) -> Running {
        // the manager must hear about it before the socket is gone
        self.manager.do_send(Disconnect { id: self.id });
        info!("Connection {} from {} closed", self.id, self.peer);
        Running::Stop
    }
}

impl StreamHandler<Result<Bytes, AnyDelimiterCodecError>> for ChessConnection {
    fn handle(&mut self, msg: Result<Bytes, AnyDelimiterCodecError>, ctx: &mut Self::Context) {
        match msg {
            Ok(line) => {
                debug!("Line from {}: {}", self.peer, String::from_utf8_lossy(&line));
                self.manager.do_send(Inbound {
                    id: self.id,
                    line: line.to_vec(),
                });
            }
            Err(e) => {
                let err = self.read_error(e);
                warn!("Dropping connection {}: {}", self.id, err);
                ctx.stop();
            }
        }
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        debug!("Peer {} closed its end", self.peer);
        ctx.stop();
    }
}

impl Handler<Outbound> for ChessConnection {
    type Result = ();

    fn handle(&mut self, msg: Outbound, _: &mut Self::Context) {
        match msg {
            Outbound::Line(line) => {
                debug!("Sending to {}: {}", self.peer, line);
                // LinesCodec only appends to the buffer, encoding cannot fail
                let _ = self.framed.write(line);
            }
            Outbound::Close => self.framed.close(),
        }
    }
}

impl WriteHandler<LinesCodecError> for ChessConnection {
    fn error(&mut self, err: LinesCodecError, _: &mut Self::Context) -> Running {
        let err = self.write_error(err);
        warn!("Write to {} failed: {}", self.peer, err);
        Running::Stop
    }

    fn finished(&mut self, ctx: &mut Self::Context) {
        debug!("Output to {} flushed and closed", self.peer);
        ctx.stop();
    }
}
