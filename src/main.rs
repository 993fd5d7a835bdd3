//! Pawsome Push CLI - operator tooling for push subscriptions.
//!
//! Checks the configured VAPID key and submits known registrations to the
//! backend registry without going through a browser.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::{Parser, Subcommand};
    use pawsome_push::{
        ApplicationServerKey, PushConfig, PushRegistration, RegistryClient, SubscriptionPayload,
    };

    /// Environment variable consulted when `--credential` is omitted.
    const TOKEN_ENV: &str = "PAWSOME_TOKEN";

    #[derive(Parser)]
    #[command(name = "pawsome-push")]
    #[command(about = "Push subscription tooling for the Pawsome backend", long_about = None)]
    #[command(version)]
    struct Cli {
        /// Backend base URL (overrides PAWSOME_API_URL)
        #[arg(long, global = true)]
        api_url: Option<String>,

        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand)]
    enum Commands {
        /// Decode and validate a VAPID public key
        CheckKey {
            /// Base64url key; defaults to the configured key
            key: Option<String>,
        },
        /// Submit an existing push registration to the backend
        Register {
            /// Bearer token (defaults to PAWSOME_TOKEN)
            #[arg(long)]
            credential: Option<String>,
            /// Push service endpoint URL
            #[arg(long)]
            endpoint: String,
            /// Browser P-256 ECDH public key
            #[arg(long)]
            p256dh: String,
            /// Auth secret
            #[arg(long)]
            auth: String,
        },
        /// Print the resolved configuration
        Config,
    }

    fn check_key(config: &PushConfig, key: Option<String>) -> Result<()> {
        let key = key
            .or_else(|| config.vapid_public_key.clone())
            .context("No VAPID public key given or configured")?;

        let decoded = ApplicationServerKey::from_base64url(&key)?;
        decoded.validate_p256()?;
        println!(
            "VAPID key OK ({} bytes, uncompressed P-256 point)",
            decoded.as_bytes().len()
        );
        Ok(())
    }

    async fn register(
        config: &PushConfig,
        credential: String,
        registration: PushRegistration,
    ) -> Result<()> {
        let client = RegistryClient::new(config);
        let payload = SubscriptionPayload::from(&registration);

        log::info!("Submitting registration for {}", payload.endpoint);
        client
            .submit(&credential, &payload)
            .await
            .with_context(|| format!("Failed to register with {}", client.subscribe_url()))?;

        println!("Registration accepted by {}", client.subscribe_url());
        Ok(())
    }

    #[tokio::main]
    pub async fn main() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_secs()
            .init();

        let cli = Cli::parse();

        let mut config = PushConfig::load();
        if let Some(api_url) = cli.api_url.as_deref() {
            config = PushConfig::new(Some(api_url), config.vapid_public_key.as_deref());
        }

        match cli.command {
            Commands::CheckKey { key } => check_key(&config, key)?,
            Commands::Register {
                credential,
                endpoint,
                p256dh,
                auth,
            } => {
                let credential = credential
                    .or_else(|| std::env::var(TOKEN_ENV).ok())
                    .with_context(|| {
                        format!("No credential given (use --credential or {TOKEN_ENV})")
                    })?;
                let registration = PushRegistration::new(endpoint, p256dh, auth);
                register(&config, credential, registration).await?;
            }
            Commands::Config => println!("{}", serde_json::to_string_pretty(&config)?),
        }

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
