//! WYC faucet — terminal front end.
//!
//! Renders the claim controller's view and forwards `connect` / `claim`
//! intents to it. The wallet is reached over its JSON-RPC endpoint.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use faucet_claim::{ClaimController, FaucetConfig, FaucetView, Locale, Outcome};
use faucet_types::Address;
use faucet_utils::{format_thousands, init_logging, LogFormat};
use faucet_wallet::{JsonRpcWallet, RpcOptions};

/// How often the HTTP wallet is polled for account changes.
const ACCOUNT_POLL: Duration = Duration::from_secs(2);

#[derive(Parser)]
#[command(name = "faucet", about = "Claim WYC test tokens from the Sepolia faucet")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint of the wallet (e.g. http://127.0.0.1:1248).
    #[arg(long, env = "FAUCET_WALLET_RPC_URL")]
    wallet_rpc_url: Option<String>,

    /// Faucet contract address.
    #[arg(long, env = "FAUCET_CONTRACT")]
    contract: Option<Address>,

    /// Message language: "en" or "id".
    #[arg(long, env = "FAUCET_LOCALE")]
    locale: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FAUCET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FAUCET_LOG_FORMAT")]
    log_format: Option<String>,

    /// Print views as JSON lines instead of text.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show the current session and supply estimate without prompting.
    Status,
    /// Ask the wallet to authorize an account.
    Connect,
    /// Request one grant of tokens.
    Claim {
        /// Keep running and show the cooldown until it ends.
        #[arg(long)]
        watch: bool,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<FaucetConfig> {
    let mut config = match &cli.config {
        Some(path) => FaucetConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FaucetConfig::default(),
    };

    if let Some(url) = &cli.wallet_rpc_url {
        config.wallet_rpc_url = Some(url.clone());
    }
    if let Some(contract) = cli.contract {
        config.contract_address = contract;
    }
    if let Some(locale) = &cli.locale {
        config.locale =
            Locale::parse(locale).with_context(|| format!("unsupported locale {locale:?}"))?;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format =
            LogFormat::parse(format).with_context(|| format!("unsupported log format {format:?}"))?;
    }
    config.validate()?;
    Ok(config)
}

async fn detect_wallet(config: &FaucetConfig) -> Option<JsonRpcWallet> {
    let url = config.wallet_rpc_url.as_deref()?;
    let options = RpcOptions {
        receipt_poll: Duration::from_millis(config.confirmation_poll_ms),
        confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
    };
    let (wallet, chain) = JsonRpcWallet::detect(url, options).await?;
    if chain != config.chain_id {
        tracing::warn!(
            "wallet is on chain {chain}, faucet lives on {}; claims will likely fail",
            config.chain_id
        );
    } else {
        tracing::info!("wallet found at {url} on {chain}");
    }
    Some(wallet)
}

fn render(view: &FaucetView, config: &FaucetConfig, json: bool) {
    if json {
        match serde_json::to_string(view) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!("failed to encode view: {e}"),
        }
        return;
    }

    let locale = config.locale;
    println!("{}", view.connect_label(locale));
    println!(
        "  {} {} remaining (estimate)",
        format_thousands(view.remaining.tokens()),
        config.token_symbol
    );
    if view.account.is_some() {
        println!(
            "  [{}]",
            view.claim_label(locale, config.grant_amount, &config.token_symbol)
        );
    }
    if let Some(message) = &view.message {
        let marker = if view.is_error() { "!" } else { "✓" };
        println!("  {marker} {message}");
    }
}

/// Connect if needed, attempt one claim, and optionally follow the cooldown.
async fn claim(
    controller: &Arc<ClaimController<JsonRpcWallet>>,
    config: &FaucetConfig,
    json: bool,
    watch: bool,
) {
    if controller.view().account.is_none() {
        if let Outcome::Failed(_) = controller.connect().await {
            render(&controller.view(), config, json);
            return;
        }
    }

    let ticker = controller.spawn_ticker();
    let outcome = controller.attempt_claim().await;
    render(&controller.view(), config, json);

    if watch && outcome.is_done() {
        let mut views = controller.subscribe();
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            render(&view, config, json);
            if view.seconds_remaining == 0 {
                break;
            }
        }
    }
    ticker.stop();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level);

    let wallet = detect_wallet(&config).await;
    let watcher = wallet.as_ref().map(|w| w.watch_accounts(ACCOUNT_POLL));
    let controller = Arc::new(ClaimController::new(wallet, &config));
    let listener = controller.spawn_account_listener();

    controller.restore().await;

    match cli.command {
        Command::Status => render(&controller.view(), &config, cli.json),
        Command::Connect => {
            controller.connect().await;
            render(&controller.view(), &config, cli.json);
        }
        Command::Claim { watch } => claim(&controller, &config, cli.json, watch).await,
    }

    if let Some(listener) = listener {
        listener.abort();
    }
    if let Some(watcher) = watcher {
        watcher.abort();
    }
    Ok(())
}
