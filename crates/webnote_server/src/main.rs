//! WebNote server entrypoint.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webnote_core::config::{env_flag_enabled, StoreKind};
use webnote_core::DEFAULT_PORT;
use webnote_server::{config::Config, serve_router, AppState, Stores};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct CliFlags {
    help: bool,
}

fn parse_cli_flags(args: &[String]) -> anyhow::Result<CliFlags> {
    let mut flags = CliFlags::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => flags.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                anyhow::bail!(
                    "Unexpected positional argument: '{}'. Use --help to see supported options.",
                    value
                );
            }
        }
    }
    Ok(flags)
}

fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.store {
        StoreKind::Redb => {
            tracing::info!("Using redb store at {}", config.db_path);
            Ok(Stores::redb(&config.db_path)?)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory store; notes are lost on exit");
            Ok(Stores::memory())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "webnote=info,webnote_server=info,webnote_core=info,tower_http=warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli_flags = parse_cli_flags(&args)?;

    if cli_flags.help {
        print_help();
        return Ok(());
    }

    let config = Config::from_env();
    if config.ephemeral_secret {
        tracing::warn!("SECRET is not set; auth cookies will not survive a restart");
    }

    let stores = open_stores(&config)?;
    let state = AppState::new(config.clone(), stores)?;

    let allow_public = env_flag_enabled("ALLOW_PUBLIC_ACCESS");
    if allow_public {
        tracing::warn!("Public access enabled - server will accept connections on any interface");
    }

    let bind = std::env::var("BIND").ok();
    let bind_addr = webnote_server::resolve_bind_address(&config, bind.as_deref(), allow_public);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr().unwrap_or(bind_addr);
    tracing::info!("WebNote running at http://{}", actual_addr);

    serve_router(listener, state, shutdown_signal()).await?;
    tracing::info!("WebNote stopped");
    Ok(())
}

fn print_help() {
    println!("WebNote Server\n");
    println!("Usage: webnote [OPTIONS]\n");
    println!("Options:");
    println!("  --help            Show this help message");
    println!("\nEnvironment variables:");
    println!("  DB_PATH           redb file path (default: ~/.cache/webnote/notes.redb)");
    println!("  STORE             redb (default) or memory");
    println!(
        "  PORT              Server port (default: {})",
        DEFAULT_PORT
    );
    println!("  SECRET            Auth token signing secret (default: random per process)");
    println!("  SALT              Salt for password hashes and share tokens");
    println!("  ROOT_REDIRECT     Redirect / to a new note instead of the directory");
    println!("  MAX_NOTE_SIZE     Maximum request size in bytes (default: 1MB)");
    println!("  ALLOW_PUBLIC_ACCESS  Allow binding to non-loopback addresses");
    println!(
        "  BIND              Override bind address (e.g. 0.0.0.0:{})",
        DEFAULT_PORT
    );
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_flags, CliFlags};

    #[test]
    fn parse_cli_flags_rejects_unknown_and_positional_arguments() {
        let cases = [
            (
                vec!["webnote".to_string(), "--verbose".to_string()],
                "Unknown option",
            ),
            (
                vec!["webnote".to_string(), "serve".to_string()],
                "Unexpected positional argument",
            ),
        ];

        for (args, expected_fragment) in cases {
            let err = parse_cli_flags(&args).expect_err("invalid args should be rejected");
            assert!(err.to_string().contains(expected_fragment));
        }
    }

    #[test]
    fn parse_cli_flags_accepts_help() {
        let args = vec!["webnote".to_string(), "--help".to_string()];
        let flags = parse_cli_flags(&args).expect("known options should parse");
        assert_eq!(flags, CliFlags { help: true });
        assert_eq!(
            parse_cli_flags(&["webnote".to_string()]).expect("no args"),
            CliFlags::default()
        );
    }
}
