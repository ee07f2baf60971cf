use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::actors::Session;
use crate::state::ServerState;

/// Accept connections forever, one session task per stream.
///
/// Accept failures are logged and skipped; a single bad handshake at the
/// socket layer never stops the listener.
pub async fn serve(listener: TcpListener, server_state: Arc<ServerState>) -> io::Result<()> {
    info!(addr = %listener.local_addr()?, server = %server_state.info.name, "Listening");

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    warn!(addr = %peer_addr, error = %e, "Failed to set TCP_NODELAY");
                }

                let session = Session::new(stream, peer_addr, Arc::clone(&server_state));
                tokio::spawn(session.run());
            }
            Err(e) => {
                warn!(error = %e, "Failed to accept connection");
            }
        }
    }
}
