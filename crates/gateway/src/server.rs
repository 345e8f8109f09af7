use std::sync::Arc;

use {
    daylog_channels::{ChannelEventSink, ChannelOutbound},
    daylog_config::{DaylogConfig, TransportMode},
    daylog_cron::{CronService, DailySchedule},
    daylog_store::{FileStore, MessageStore},
    daylog_telegram::{TelegramConfig, TelegramOutbound, bot, webhook_router},
    secrecy::ExposeSecret,
    tokio::{net::TcpListener, task::JoinHandle},
    tokio_util::sync::CancellationToken,
    tracing::{error, info, warn},
};

use crate::{
    event::{EVENT_QUEUE_CAPACITY, EventQueue},
    event_loop::EventLoop,
};

/// Name of the scheduled job in logs.
const DIGEST_JOB: &str = "daily-digest";

/// Run the bot until Ctrl-C or until the transport gives up.
pub async fn start_gateway(config: DaylogConfig) -> anyhow::Result<()> {
    let schedule = DailySchedule::new(config.schedule.hour, config.schedule.minute)?;

    let telegram = TelegramConfig::new(config.token.clone());
    let tg_bot = telegram.build_bot()?;
    bot::connect(&tg_bot).await?;

    let store: Arc<dyn MessageStore> = Arc::new(FileStore::new(&config.data_file));
    let outbound: Arc<dyn ChannelOutbound> = Arc::new(TelegramOutbound::new(tg_bot.clone()));
    info!(path = %config.data_file.display(), "using message store");

    let cancel = CancellationToken::new();
    let (queue, rx) = EventQueue::channel(EVENT_QUEUE_CAPACITY);
    let event_loop = tokio::spawn(EventLoop::new(store, outbound).run(rx, cancel.clone()));

    let cron = CronService::new(DIGEST_JOB, schedule, queue.digest_trigger());
    cron.start().await?;

    let sink: Arc<dyn ChannelEventSink> = Arc::new(queue);
    let transport = match &config.transport {
        TransportMode::Polling => bot::start_polling(tg_bot, sink, cancel.clone()).await?,
        TransportMode::Webhook { public_url } => {
            let addr = format!("{}:{}", config.server.bind, config.server.port);
            let listener = TcpListener::bind(&addr).await?;
            let local_addr = listener.local_addr()?;
            info!(addr = %local_addr, "webhook listener bound");

            bot::register_webhook(&tg_bot, public_url, config.token.expose_secret()).await?;
            serve_webhook(listener, webhook_router(config.token.clone(), sink), cancel.clone())
        },
    };

    let status = cron.status().await;
    info!(
        schedule = %cron.schedule(),
        next_run_at = ?status.next_run_at,
        "daylog running"
    );

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "failed to listen for ctrl-c");
            }
            info!("shutdown requested");
        },
        () = cancel.cancelled() => {
            warn!("transport stopped, shutting down");
        },
    }

    cancel.cancel();
    cron.stop().await;
    if let Err(e) = transport.await {
        error!(error = %e, "transport task failed");
    }
    if let Err(e) = event_loop.await {
        error!(error = %e, "event loop task failed");
    }
    info!("daylog stopped");
    Ok(())
}

fn serve_webhook(
    listener: TcpListener,
    app: axum::Router,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let shutdown = cancel.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await;
        if let Err(e) = result {
            error!(error = %e, "webhook server failed");
            cancel.cancel();
        }
    })
}
