//! Interview scorer HTTP server entrypoint.

use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use scorer::config::Config;
use scorer::gateway::{HandlerState, create_router_with_state};
use scorer::model::LoadedArtifacts;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
███████╗ ██████╗ ██████╗ ██████╗ ███████╗██████╗
██╔════╝██╔════╝██╔═══██╗██╔══██╗██╔════╝██╔══██╗
███████╗██║     ██║   ██║██████╔╝█████╗  ██████╔╝
╚════██║██║     ██║   ██║██╔══██╗██╔══╝  ██╔══██╗
███████║╚██████╗╚██████╔╝██║  ██║███████╗██║  ██║
╚══════╝ ╚═════╝ ╚═════╝ ╚═╝  ╚═╝╚══════╝╚═╝  ╚═╝

        ANSWER. SCORE. IMPROVE.
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr = config.socket_addr();

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        dataset_dir = %config.dataset_dir.display(),
        "Interview scorer starting"
    );

    let artifacts = LoadedArtifacts::load(&config.vectorizer_path(), &config.model_path());
    let state = HandlerState::from_artifacts(artifacts);
    if state.evaluator.is_none() {
        tracing::warn!("Artifacts missing or unreadable; /evaluate-answer will return 500");
    }

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Interview scorer shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    probe_health(Config::health_check_port())
}

/// Exit code for `--health-check`: 0 if `/health` answers 2xx within a second.
fn probe_health(port: u16) -> i32 {
    let url = format!("http://127.0.0.1:{}/health", port);

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("health check: failed to build runtime: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                eprintln!("health check: failed to build client: {}", e);
                return 1;
            }
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scorer::model::{LinearClassifier, TfidfVectorizer};

    #[test]
    fn test_probe_health_fails_when_nothing_listens() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        assert_eq!(probe_health(port), 1);
    }

    #[test]
    fn test_probe_health_succeeds_against_running_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        listener.set_nonblocking(true).unwrap();

        let server = std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = TcpListener::from_std(listener).unwrap();
                let state =
                    HandlerState::<TfidfVectorizer, LinearClassifier>::unloaded(Default::default());
                let app = create_router_with_state(state);
                let _ = tokio::time::timeout(Duration::from_secs(5), axum::serve(listener, app))
                    .await;
            });
        });

        let mut code = 1;
        for _ in 0..50 {
            code = probe_health(port);
            if code == 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        assert_eq!(code, 0);
        drop(server);
    }
}
