use actix::prelude::*;
use futures::stream;
use log::{info, warn};
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};

use crate::config::ServerConfig;
use crate::connection::ChessConnection;
use crate::session::SessionManager;

/// Accepts TCP clients and spawns a `ChessConnection` for each
pub struct ChessListener {
    manager: Addr<SessionManager>,
    max_line_length: usize,
    accepted: usize,
}

impl ChessListener {
    /// Bind `config.bind` and start accepting. Returns the bound address,
    /// which differs from the configured one when port 0 was requested.
    pub async fn bind(
        config: &ServerConfig,
        manager: Addr<SessionManager>,
    ) -> io::Result<(SocketAddr, Addr<ChessListener>)> {
        let listener = TcpListener::bind(&config.bind).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening for chess clients on {}", local_addr);

        let max_line_length = config.max_line_length;
        let addr = ChessListener::create(move |ctx| {
            ctx.add_stream(stream::unfold(listener, |listener| async move {
                let accepted = listener.accept().await;
                Some((accepted, listener))
            }));
            ChessListener {
                manager,
                max_line_length,
                accepted: 0,
            }
        });
        Ok((local_addr, addr))
    }
}

impl Actor for ChessListener {
    type Context = Context<Self>;
}

impl StreamHandler<io::Result<(TcpStream, SocketAddr)>> for ChessListener {
    fn handle(&mut self, msg: io::Result<(TcpStream, SocketAddr)>, _: &mut Self::Context) {
        match msg {
            Ok((stream, peer)) => {
                self.accepted += 1;
                info!("Accepted {} (connection #{})", peer, self.accepted);
                ChessConnection::serve(stream, peer, self.manager.clone(), self.max_line_length);
            }
            // the listening socket survives a failed accept
            Err(e) => warn!("Accept failed: {}", e),
        }
    }
}
