use std::{sync::Arc, time::Duration};

use {
    reqwest::Url,
    teloxide::{
        ApiError, RequestError,
        prelude::*,
        types::{AllowedUpdate, BotCommand, Me},
    },
    tokio::task::JoinHandle,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info, warn},
};

use daylog_channels::ChannelEventSink;

use crate::{Error, Result, config::POLL_TIMEOUT_SECS, handlers};

/// Pause after a failed `getUpdates` before asking again.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Verify the token and register the command menu.
pub async fn connect(bot: &Bot) -> Result<Me> {
    let me = bot.get_me().await?;

    let commands = vec![
        BotCommand::new("start", "What this bot does"),
        BotCommand::new("help", "What this bot does"),
    ];
    if let Err(e) = bot.set_my_commands(commands).await {
        warn!("failed to register bot commands: {e}");
    }

    info!(username = ?me.username, "telegram bot connected");
    Ok(me)
}

/// Point Telegram at `<public_url>/webhook/<token>`.
pub async fn register_webhook(bot: &Bot, public_url: &str, token: &str) -> Result<()> {
    let url = Url::parse(&format!("{public_url}/webhook/{token}"))
        .map_err(|e| Error::external("invalid webhook url", e))?;
    bot.set_webhook(url)
        .allowed_updates(vec![AllowedUpdate::Message])
        .await?;
    info!(public_url, "telegram webhook registered");
    Ok(())
}

/// Start long polling.
///
/// Clears any webhook first, since Telegram refuses `getUpdates` while one
/// is set. The loop runs until `cancel` fires, or until Telegram reports
/// another instance polling with the same token.
pub async fn start_polling(
    bot: Bot,
    sink: Arc<dyn ChannelEventSink>,
    cancel: CancellationToken,
) -> Result<JoinHandle<()>> {
    bot.delete_webhook().send().await?;
    info!("telegram webhook cleared, starting polling loop");

    let handle = tokio::spawn(async move {
        let mut offset: i32 = 0;

        loop {
            let request = bot
                .get_updates()
                .offset(offset)
                .timeout(POLL_TIMEOUT_SECS)
                .allowed_updates(vec![AllowedUpdate::Message]);

            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                result = request.send() => result,
            };

            match result {
                Ok(updates) => {
                    debug!(count = updates.len(), "got telegram updates");
                    for update in updates {
                        offset = update.id.as_offset();
                        if let Err(e) = handlers::handle_update(update, sink.as_ref()).await {
                            warn!(error = %e, "event queue closed, stopping polling");
                            cancel.cancel();
                            break;
                        }
                    }
                },
                Err(RequestError::Api(ApiError::TerminatedByOtherGetUpdates)) => {
                    error!("another instance is already polling with this token, stopping");
                    cancel.cancel();
                    break;
                },
                Err(e) => {
                    warn!(error = %e, "telegram getUpdates failed");
                    tokio::select! {
                        () = cancel.cancelled() => break,
                        () = tokio::time::sleep(POLL_ERROR_BACKOFF) => {},
                    }
                },
            }
        }
        info!("telegram polling stopped");
    });

    Ok(handle)
}
