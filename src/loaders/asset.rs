use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use super::mesh::MeshData;
use super::{gltf, stl, AssetError};

const READ_CHUNK: usize = 64 * 1024;

/// Bytes read so far for an in-flight load
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl LoadProgress {
    /// Fraction in [0, 1], or `None` when the total size is unknown
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some(self.loaded as f64 / total as f64),
            _ => None,
        }
    }
}

/// One observable outcome of a mesh load
#[derive(Debug)]
pub enum LoadEvent {
    Progress(LoadProgress),
    Loaded(MeshData),
    Failed(String),
}

/// Single-shot background mesh load
///
/// The file is read and parsed on a worker thread; `poll` drains whatever
/// events are ready without blocking. Exactly one terminal event
/// (`Loaded` or `Failed`) is ever produced. There is no cancellation.
pub struct AssetLoader {
    receiver: Receiver<LoadEvent>,
    finished: bool,
}

impl AssetLoader {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel();

        let worker_sender = sender.clone();
        let spawned = thread::Builder::new()
            .name("mesh-loader".to_string())
            .spawn(move || run_load(&path, &worker_sender));

        if let Err(e) = spawned {
            sender
                .send(LoadEvent::Failed(format!("Failed to start loader thread: {e}")))
                .ok();
        }

        Self {
            receiver,
            finished: false,
        }
    }

    /// True once the terminal event has been handed out
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        if self.finished {
            return events;
        }

        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let terminal = matches!(event, LoadEvent::Loaded(_) | LoadEvent::Failed(_));
                    events.push(event);
                    if terminal {
                        self.finished = true;
                        break;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.push(LoadEvent::Failed(
                        "Loader thread exited without a result".to_string(),
                    ));
                    self.finished = true;
                    break;
                }
            }
        }

        events
    }
}

fn run_load(path: &Path, sender: &Sender<LoadEvent>) {
    let result = load_mesh_file(path, |progress| {
        sender.send(LoadEvent::Progress(progress)).ok();
    });

    let event = match result {
        Ok(mesh) => LoadEvent::Loaded(mesh),
        Err(e) => LoadEvent::Failed(format!("{e:#}")),
    };
    sender.send(event).ok();
}

/// Reads and parses a mesh file, reporting read progress as it goes
pub fn load_mesh_file(path: &Path, on_progress: impl FnMut(LoadProgress)) -> Result<MeshData> {
    let bytes = read_with_progress(path, on_progress)?;
    parse_mesh(path, &bytes)
}

/// Chooses the parser from the file extension
pub fn parse_mesh(path: &Path, bytes: &[u8]) -> Result<MeshData> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let mesh = match extension.as_deref() {
        Some("stl") => stl::parse_stl(bytes).context(format!("Failed to parse STL {:?}", path))?,
        Some("glb") => gltf::load_gltf_slice(bytes)?,
        // External buffers are resolved relative to the file, so re-open by path
        Some("gltf") => gltf::load_gltf_file(path)?,
        _ => return Err(AssetError::UnsupportedFormat(extension).into()),
    };

    if mesh.triangle_count() == 0 {
        return Err(AssetError::EmptyMesh.into());
    }
    Ok(mesh)
}

fn read_with_progress(path: &Path, mut on_progress: impl FnMut(LoadProgress)) -> Result<Vec<u8>> {
    let mut file = File::open(path).context(format!("Failed to open {:?}", path))?;
    let total = file.metadata().ok().map(|m| m.len());

    let mut bytes = Vec::with_capacity(total.unwrap_or(0) as usize);
    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = file
            .read(&mut chunk)
            .context(format!("Failed to read {:?}", path))?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        on_progress(LoadProgress {
            loaded: bytes.len() as u64,
            total,
        });
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_for_terminal(loader: &mut AssetLoader) -> Vec<LoadEvent> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut all = Vec::new();
        while !loader.is_finished() && Instant::now() < deadline {
            all.extend(loader.poll());
            thread::sleep(Duration::from_millis(5));
        }
        all
    }

    #[test]
    fn progress_fraction() {
        let p = LoadProgress {
            loaded: 25,
            total: Some(100),
        };
        assert_eq!(p.fraction(), Some(0.25));
        let unknown = LoadProgress {
            loaded: 25,
            total: None,
        };
        assert_eq!(unknown.fraction(), None);
        let zero = LoadProgress {
            loaded: 0,
            total: Some(0),
        };
        assert_eq!(zero.fraction(), None);
    }

    #[test]
    fn unsupported_extension_fails() {
        let err = parse_mesh(Path::new("model.obj"), b"v 0 0 0").unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn missing_file_reports_failure_once() {
        let mut loader = AssetLoader::spawn("definitely/missing/model.stl");
        let events = wait_for_terminal(&mut loader);

        assert!(loader.is_finished());
        let failures = events
            .iter()
            .filter(|e| matches!(e, LoadEvent::Failed(_)))
            .count();
        assert_eq!(failures, 1);
        assert!(loader.poll().is_empty());
    }
}
