use std::net::{IpAddr, Ipv6Addr};
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use futures::{future, Future};
use futures_util::StreamExt;
use tarpc::server::{self, incoming::Incoming, Channel};
use tarpc::tokio_serde::formats::Json;
use tracing::{info, warn};

use bookinfo::config::ServerArgs;
use bookinfo::limits::ConnectionLimiter;
use bookinfo::logging::init_logging;
use bookinfo::{BookInfo, BookInfoServer, BookStore};

async fn spawn(fut: impl Future<Output = ()> + Send + 'static) {
    tokio::spawn(fut);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = ServerArgs::parse();
    init_logging(args.json_logs);

    // The store starts empty and lives until shutdown
    let server = BookInfoServer::new(Arc::new(BookStore::new()));
    let limiter = ConnectionLimiter::new(args.max_connections as usize);

    // JSON over TCP, serde-powered via tarpc's serde_transport.
    let mut listener = tarpc::serde_transport::tcp::listen(&args.address, Json::default)
        .await
        .with_context(|| format!("failed to listen on {}", args.address))?;
    listener.config_mut().max_frame_length(args.max_frame_length);

    info!(
        address = %listener.local_addr(),
        max_connections = limiter.max_connections(),
        max_channels_per_ip = args.max_channels_per_ip,
        "server listening"
    );

    let serve = listener
        .filter_map(|r| {
            future::ready(match r {
                Ok(transport) => Some(transport),
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    None
                }
            })
        })
        .map(server::BaseChannel::with_defaults)
        .max_channels_per_key(args.max_channels_per_ip, |t| {
            t.transport()
                .peer_addr()
                .map(|addr| addr.ip())
                .unwrap_or(IpAddr::V6(Ipv6Addr::UNSPECIFIED))
        })
        .for_each(|channel| {
            let server = server.clone();
            let limiter = limiter.clone();
            async move {
                let peer = channel.transport().peer_addr().ok();
                let Some(permit) = limiter.try_acquire() else {
                    warn!(
                        ?peer,
                        active = limiter.active(),
                        max_connections = limiter.max_connections(),
                        "connection limit reached, rejecting"
                    );
                    return;
                };
                info!(?peer, active = limiter.active(), "new connection");

                tokio::spawn(async move {
                    channel.execute(server.serve()).await;
                    drop(permit);
                    info!(?peer, active = limiter.active(), "client disconnected");
                });
            }
        });

    tokio::select! {
        _ = serve => warn!("listener closed"),
        _ = tokio::signal::ctrl_c() => info!(books = server.store().len(), "shutting down"),
    }
    Ok(())
}
