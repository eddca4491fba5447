use chrono::Utc;
use tracing::{info, warn};

use threadwatch::config::ThreadwatchConfig;
use threadwatch::notify::{self, DiscordNotifier, Notifier};
use threadwatch::pipeline::UpdatePipeline;
use threadwatch::session::HttpSession;

use crate::error::*;
use crate::ui::StdoutNotifier;

pub fn check(config: ThreadwatchConfig, dry_run: bool) -> Result<(), CliError> {
    let config = config.resolve()?;

    if config.forums.is_empty() {
        warn!("No forums configured. Nothing to check.");
    }

    // Set up the notifier first, so a missing destination fails before any requests are made.
    let notifier: Box<dyn Notifier> = if dry_run {
        Box::new(StdoutNotifier)
    } else {
        let discord = config.discord.clone().ok_or_else(|| {
            CliError::new(
                CliErrorKind::Config,
                "No [discord] section in configuration. Use --dry-run to print updates instead.",
            )
        })?;

        Box::new(DiscordNotifier::new(
            discord.bot_token,
            discord.channel_id,
            config.request_timeout,
        )?)
    };

    let session = HttpSession::new(config.pipeline.base_url.clone(), config.request_timeout)?;

    if let Some(auth) = &config.auth {
        session.login(&auth.username, &auth.password)?;
    } else {
        info!("No credentials configured. Fetching pages anonymously.");
    }

    let pipeline = UpdatePipeline::new(&session, config.pipeline.clone());
    let events = pipeline.run(&config.forums, Utc::now())?;

    eprintln!("{} updated threads found.", events.len());

    notify::dispatch(notifier.as_ref(), &events, &config.message)?;

    Ok(())
}
