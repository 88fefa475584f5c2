use poise::serenity_prelude::{self as serenity, GatewayIntents};
use support_ticket_bot::{
    BOT_NAME, BotConfig, Data, Error, SlugVocabulary, commands, handlers, logging,
};
use tracing::{error, info};

async fn async_main() -> Result<(), Error> {
    logging::init()?;

    let config = BotConfig::from_env()?;
    let vocabulary = SlugVocabulary::load(&config.vocabulary_file).await?;
    let token = config.discord_token.clone();
    let data = Data::new(config, vocabulary)?;
    info!(?data, "Shared state ready");

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::inventory(),
                commands::profile(),
                commands::report(),
                commands::slug(),
                commands::validate(),
            ],
            pre_command: |ctx| {
                Box::pin(async move {
                    logging::log_command_start(ctx);
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    logging::log_command_end(ctx);
                })
            },
            on_error: |error| Box::pin(logging::on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                logging::log_console("Registering commands");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::ClientBuilder::new(token, intents)
        .event_handler(handlers::Handler)
        .framework(framework)
        .await?;

    info!("Starting {BOT_NAME}...");
    client.start().await?;

    Ok(())
}

fn main() {
    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(Error::from)
        .and_then(|runtime| runtime.block_on(async_main()));

    if let Err(err) = result {
        error!(error = %err, "Bot stopped");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
