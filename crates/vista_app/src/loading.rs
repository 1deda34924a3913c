//! Background asset loading
//!
//! Loads run off the render loop: on a worker thread natively, as a
//! `fetch` future in the browser. Results come back over a channel the
//! engine drains once per frame, so the scene keeps animating while a
//! model downloads and a failed load never stops the loop.

use std::fmt;
use std::path::Path;
#[cfg(target_arch = "wasm32")]
use std::path::PathBuf;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use vista_3d::loader::{GltfLoader, HdrImage, HdrLoader, LoadError, LoadedScene, Progress};

/// Which asset an event refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Model,
    Environment,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Model => write!(f, "model"),
            AssetKind::Environment => write!(f, "environment"),
        }
    }
}

/// Messages from in-flight loads
#[derive(Debug)]
pub enum AssetEvent {
    Progress { asset: AssetKind, percent: f32 },
    Model(Box<LoadedScene>),
    Environment(Box<HdrImage>),
    Failed { asset: AssetKind, error: LoadError },
}

impl AssetEvent {
    fn finishes_load(&self) -> bool {
        !matches!(self, AssetEvent::Progress { .. })
    }
}

/// Starts loads and collects their results
pub struct AssetLoader {
    tx: UnboundedSender<AssetEvent>,
    rx: UnboundedReceiver<AssetEvent>,
    in_flight: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, in_flight: 0 }
    }

    /// Start loading a glTF/GLB model
    pub fn load_model(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        tracing::info!(path = %path.display(), "loading model");
        self.in_flight += 1;

        #[cfg(not(target_arch = "wasm32"))]
        spawn_worker(self.tx.clone(), AssetKind::Model, move |progress| {
            GltfLoader::new()
                .load_path(&path, progress)
                .map(|scene| AssetEvent::Model(Box::new(scene)))
        });

        #[cfg(target_arch = "wasm32")]
        spawn_fetch(path, self.tx.clone(), AssetKind::Model, |bytes| {
            GltfLoader::new()
                .load_slice(bytes)
                .map(|scene| AssetEvent::Model(Box::new(scene)))
        });
    }

    /// Start loading an equirectangular HDR environment
    pub fn load_environment(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        tracing::info!(path = %path.display(), "loading environment");
        self.in_flight += 1;

        #[cfg(not(target_arch = "wasm32"))]
        spawn_worker(self.tx.clone(), AssetKind::Environment, move |progress| {
            HdrLoader
                .load_path(&path, progress)
                .map(|image| AssetEvent::Environment(Box::new(image)))
        });

        #[cfg(target_arch = "wasm32")]
        spawn_fetch(path, self.tx.clone(), AssetKind::Environment, |bytes| {
            HdrLoader
                .load_slice(bytes)
                .map(|image| AssetEvent::Environment(Box::new(image)))
        });
    }

    /// Every event that arrived since the last poll
    pub fn poll(&mut self) -> Vec<AssetEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if event.finishes_load() {
                        self.in_flight = self.in_flight.saturating_sub(1);
                    }
                    events.push(event);
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Loads started and not yet finished
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[cfg(test)]
    fn sender(&self) -> UnboundedSender<AssetEvent> {
        self.tx.clone()
    }
}

fn report(tx: &UnboundedSender<AssetEvent>, asset: AssetKind, progress: Progress) {
    // The receiver only goes away with the engine; nothing left to tell
    let _ = tx.send(AssetEvent::Progress {
        asset,
        percent: progress.percent(),
    });
}

fn finish(tx: &UnboundedSender<AssetEvent>, asset: AssetKind, result: Result<AssetEvent, LoadError>) {
    let event = result.unwrap_or_else(|error| AssetEvent::Failed { asset, error });
    let _ = tx.send(event);
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_worker<L>(tx: UnboundedSender<AssetEvent>, asset: AssetKind, load: L)
where
    L: FnOnce(&mut dyn FnMut(Progress)) -> Result<AssetEvent, LoadError> + Send + 'static,
{
    let worker = std::thread::Builder::new()
        .name(format!("vista-load-{asset}"))
        .spawn({
            let tx = tx.clone();
            move || {
                let result = load(&mut |p| report(&tx, asset, p));
                finish(&tx, asset, result);
            }
        });
    if let Err(e) = worker {
        finish(&tx, asset, Err(LoadError::from(e)));
    }
}

#[cfg(target_arch = "wasm32")]
fn spawn_fetch<P>(path: PathBuf, tx: UnboundedSender<AssetEvent>, asset: AssetKind, parse: P)
where
    P: FnOnce(&[u8]) -> Result<AssetEvent, LoadError> + 'static,
{
    let url = path.to_string_lossy().replace('\\', "/");
    wasm_bindgen_futures::spawn_local(async move {
        let result = fetch_bytes(&url).await.and_then(|bytes| {
            let total = bytes.len() as u64;
            report(&tx, asset, Progress { loaded: total, total });
            parse(&bytes)
        });
        finish(&tx, asset, result);
    });
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(url: &str) -> Result<Vec<u8>, LoadError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    fn js_error(value: wasm_bindgen::JsValue) -> LoadError {
        LoadError::Io(std::io::Error::other(format!("{value:?}")))
    }

    let window = web_sys::window().ok_or_else(|| LoadError::Io(std::io::Error::other("no window")))?;
    let response = JsFuture::from(window.fetch_with_str(url)).await.map_err(js_error)?;
    let response: web_sys::Response = response.dyn_into().map_err(js_error)?;
    if !response.ok() {
        return Err(LoadError::NotFound(format!("{url}: HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_result(loader: &mut AssetLoader) -> Vec<AssetEvent> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut events = Vec::new();
        while loader.in_flight() > 0 && Instant::now() < deadline {
            events.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        events
    }

    #[test]
    fn test_missing_model_reports_failure() {
        let mut loader = AssetLoader::new();
        loader.load_model("/nonexistent/vista/frame.glb");
        assert_eq!(loader.in_flight(), 1);

        let events = wait_for_result(&mut loader);
        assert_eq!(loader.in_flight(), 0);
        assert!(matches!(
            events.last(),
            Some(AssetEvent::Failed {
                asset: AssetKind::Model,
                error: LoadError::NotFound(_)
            })
        ));
    }

    #[test]
    fn test_unparseable_environment_reports_failure() {
        let path = std::env::temp_dir().join(format!("vista-loading-{}.hdr", std::process::id()));
        std::fs::write(&path, b"not an hdr").unwrap();

        let mut loader = AssetLoader::new();
        loader.load_environment(&path);
        let events = wait_for_result(&mut loader);
        let _ = std::fs::remove_file(&path);

        assert!(events
            .iter()
            .any(|e| matches!(e, AssetEvent::Progress { asset: AssetKind::Environment, .. })));
        assert!(matches!(
            events.last(),
            Some(AssetEvent::Failed {
                asset: AssetKind::Environment,
                ..
            })
        ));
    }

    #[test]
    fn test_progress_does_not_finish_load() {
        let mut loader = AssetLoader::new();
        loader.in_flight = 1;
        let tx = loader.sender();
        tx.send(AssetEvent::Progress {
            asset: AssetKind::Model,
            percent: 50.0,
        })
        .unwrap();
        assert_eq!(loader.poll().len(), 1);
        assert_eq!(loader.in_flight(), 1);
        assert!(loader.poll().is_empty());
    }
}
