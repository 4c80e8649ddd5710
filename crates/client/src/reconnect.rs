//! The per-network supervisor: connect, pump inbound events into the
//! dispatcher, and on any disconnect wait a fixed delay and try
//! again, forever. Only an explicit shutdown ends the loop.

use std::{sync::Arc, time::Duration};

use {
    tokio::time::sleep,
    tokio_util::sync::CancellationToken,
    tracing::{info, warn},
};

use {burrow_common::Message, burrow_core::Bot};

use crate::{sink::SessionSink, transport::Transport};

/// Drive one network session until `shutdown` fires.
///
/// Each established connection has its write half installed into
/// `sink` for the duration of the connection; inbound events become
/// messages carrying that same session sink, so replies from hooks
/// still running after a disconnect degrade to logged drops rather
/// than writes into a dead socket. Connect failures and lost
/// connections both wait `reconnect_delay` and retry; there is no
/// backoff and no attempt cap.
pub async fn run_network(
    transport: Arc<dyn Transport>,
    bot: Arc<Bot>,
    sink: Arc<SessionSink>,
    reconnect_delay: Duration,
    shutdown: CancellationToken,
) {
    let network = bot.session().network().to_owned();
    let reply: Arc<dyn burrow_common::ReplySink> = sink.clone();

    loop {
        let connected = tokio::select! {
            () = shutdown.cancelled() => return,
            result = transport.connect() => result,
        };
        let (mut conn, write) = match connected {
            Ok(pair) => pair,
            Err(error) => {
                warn!(network = %network, %error, delay = ?reconnect_delay, "connect failed, retrying");
                tokio::select! {
                    () = shutdown.cancelled() => return,
                    () = sleep(reconnect_delay) => continue,
                }
            },
        };

        sink.attach(write).await;
        info!(network = %network, "connected");

        loop {
            let event = tokio::select! {
                () = shutdown.cancelled() => {
                    sink.detach().await;
                    return;
                },
                event = conn.next_event() => event,
            };
            match event {
                Ok(Some(inbound)) => {
                    let message = Message::new(
                        inbound.body,
                        inbound.source,
                        inbound.target,
                        inbound.private,
                        Arc::clone(&reply),
                    );
                    bot.dispatch(&message).await;
                },
                Ok(None) => {
                    info!(network = %network, "connection closed");
                    break;
                },
                Err(error) => {
                    warn!(network = %network, %error, "connection lost");
                    break;
                },
            }
        }

        sink.detach().await;
        tokio::select! {
            () = shutdown.cancelled() => return,
            () = sleep(reconnect_delay) => {},
        }
    }
}
