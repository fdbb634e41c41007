//! Test server harness.

use scorer::constants::{MODEL_FILENAME, VECTORIZER_FILENAME};
use scorer::gateway::{HandlerState, create_router_with_state};
use scorer::model::{
    Label, LinearKind, LinearModelArtifact, LoadedArtifacts, NormKind, TfidfArtifact,
};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;

/// Vocabulary shared by every test vectorizer.
pub const VOCABULARY: [&str; 5] = ["rust", "tokio", "ownership", "borrow", "async"];

/// Score the regression fixture always predicts (truncated from 72.9).
pub const REGRESSION_SCORE: u64 = 72;

/// Which artifacts the spawned server finds in its dataset directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactSetup {
    /// rkyv archives; binary logistic model rewarding [`VOCABULARY`] terms.
    #[default]
    Rkyv,
    /// JSON artifacts; regression model predicting a constant 72.9.
    Json,
    /// Empty dataset directory.
    Missing,
    /// Valid vectorizer, model file full of garbage.
    CorruptModel,
}

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    pub port: u16,
    pub artifacts: ArtifactSetup,
}

impl TestServerConfig {
    pub fn with_artifacts(artifacts: ArtifactSetup) -> Self {
        Self {
            artifacts,
            ..Default::default()
        }
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _dataset_dir: TempDir,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

pub fn tfidf_fixture() -> TfidfArtifact {
    TfidfArtifact {
        terms: VOCABULARY.iter().map(|t| t.to_string()).collect(),
        idf: vec![1.0, 1.2, 1.4, 1.6, 1.8],
        lowercase: true,
        sublinear_tf: false,
        norm: NormKind::L2,
    }
}

/// With L2-normalized non-negative features, any vocabulary hit gives a
/// decision value of at least 4, so p >= 0.98.
pub fn logistic_fixture() -> LinearModelArtifact {
    LinearModelArtifact {
        kind: LinearKind::Logistic,
        classes: vec![Label::Text("weak".into()), Label::Text("strong".into())],
        coef: vec![vec![4.0; VOCABULARY.len()]],
        intercept: vec![0.0],
    }
}

pub fn regression_fixture() -> LinearModelArtifact {
    LinearModelArtifact {
        kind: LinearKind::Regression,
        classes: vec![],
        coef: vec![vec![0.0; VOCABULARY.len()]],
        intercept: vec![72.9],
    }
}

/// Writes the artifacts for `setup` into `dir`.
pub fn write_artifacts(dir: &Path, setup: ArtifactSetup) -> Result<(), ServerStartupError> {
    let failed = |e: String| ServerStartupError::StartupFailed(e);
    let vectorizer_path = dir.join(VECTORIZER_FILENAME);
    let model_path = dir.join(MODEL_FILENAME);

    match setup {
        ArtifactSetup::Rkyv => {
            let vectorizer = tfidf_fixture()
                .to_rkyv_bytes()
                .map_err(|e| failed(e.to_string()))?;
            let model = logistic_fixture()
                .to_rkyv_bytes()
                .map_err(|e| failed(e.to_string()))?;
            std::fs::write(vectorizer_path, vectorizer.as_slice())?;
            std::fs::write(model_path, model.as_slice())?;
        }
        ArtifactSetup::Json => {
            let vectorizer =
                serde_json::to_vec(&tfidf_fixture()).map_err(|e| failed(e.to_string()))?;
            let model =
                serde_json::to_vec(&regression_fixture()).map_err(|e| failed(e.to_string()))?;
            std::fs::write(vectorizer_path, vectorizer)?;
            std::fs::write(model_path, model)?;
        }
        ArtifactSetup::Missing => {}
        ArtifactSetup::CorruptModel => {
            let vectorizer = tfidf_fixture()
                .to_rkyv_bytes()
                .map_err(|e| failed(e.to_string()))?;
            std::fs::write(vectorizer_path, vectorizer.as_slice())?;
            std::fs::write(model_path, b"\x80\x04\x95 not a model")?;
        }
    }

    Ok(())
}

/// Spawns a server whose artifacts are loaded from a fresh temp dataset directory,
/// through the same [`LoadedArtifacts::load`] path the binary uses.
///
/// # Example
///
/// ```ignore
/// let server = spawn_test_server(TestServerConfig::default()).await?;
/// let client = reqwest::Client::new();
/// let resp = client.get(format!("{}/health", server.url())).send().await?;
/// assert!(resp.status().is_success());
/// ```
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let dataset_dir =
        TempDir::new().map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    write_artifacts(dataset_dir.path(), config.artifacts)?;

    let artifacts = LoadedArtifacts::load(
        &dataset_dir.path().join(VECTORIZER_FILENAME),
        &dataset_dir.path().join(MODEL_FILENAME),
    );
    let state = HandlerState::from_artifacts(artifacts);
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _dataset_dir: dataset_dir,
    })
}
