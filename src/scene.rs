use futures::channel::oneshot;
use glam::Vec3;
use std::path::PathBuf;

use crate::core::RenderPipeline;
use crate::loaders::{load_world_file, LoadError};
use crate::types::GpuVertex;

/// A world-space vertex position
pub type Vertex = Vec3;

/// Immutable triangle list; consecutive vertex triples form one triangle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    vertices: Vec<Vertex>,
}

impl Scene {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Flatten into the vertex buffer layout
    pub fn to_gpu_vertices(&self) -> Vec<GpuVertex> {
        self.vertices.iter().copied().map(GpuVertex::new).collect()
    }
}

/// Uploaded geometry: the backend buffer handle and how many vertices it holds
#[derive(Debug)]
pub struct UploadedScene<H> {
    pub buffer: H,
    pub vertex_count: u32,
}

enum LoadState<H> {
    Unloaded,
    Loading(oneshot::Receiver<Result<Scene, LoadError>>),
    Ready(UploadedScene<H>),
    Failed(String),
}

/// Observable load progress of a [`SceneBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus<'a> {
    Unloaded,
    Loading,
    Ready,
    Failed(&'a str),
}

/// Owns the uploaded scene for the lifetime of the application.
///
/// Loading happens off the render thread; [`SceneBuffer::poll`] picks up the
/// result once per tick and performs the single upload. Until then the buffer
/// is not ready and frames are drawn empty.
pub struct SceneBuffer<H> {
    state: LoadState<H>,
}

impl<H> SceneBuffer<H> {
    pub fn new() -> Self {
        Self {
            state: LoadState::Unloaded,
        }
    }

    /// Start loading a world file in the background
    pub fn begin_load(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::info!("Loading world: {:?}", path);
        self.load_with(move || load_world_file(path));
    }

    /// Start loading with an arbitrary loader running on a worker thread
    pub fn load_with<F>(&mut self, loader: F)
    where
        F: FnOnce() -> Result<Scene, LoadError> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();

        let spawned = std::thread::Builder::new()
            .name("world-loader".into())
            .spawn(move || {
                sender.send(loader()).ok();
            });

        self.state = match spawned {
            Ok(_) => LoadState::Loading(receiver),
            Err(e) => Self::failed(format!("failed to start world loader: {e}")),
        };
    }

    /// Check for a finished load; uploads on success.
    /// Returns true on the call that made the buffer ready.
    pub fn poll<P>(&mut self, pipeline: &mut P) -> bool
    where
        P: RenderPipeline<Buffer = H>,
    {
        let outcome = match &mut self.state {
            LoadState::Loading(receiver) => receiver.try_recv(),
            _ => return false,
        };

        match outcome {
            Ok(None) => false,
            Ok(Some(Ok(scene))) => {
                self.upload(pipeline, &scene);
                true
            }
            Ok(Some(Err(e))) => {
                self.state = Self::failed(format!("{:#}", anyhow::Error::from(e)));
                false
            }
            Err(oneshot::Canceled) => {
                self.state = Self::failed(LoadError::Disconnected.to_string());
                false
            }
        }
    }

    /// Transfer the scene to backend storage once and record its vertex count
    pub fn upload<P>(&mut self, pipeline: &mut P, scene: &Scene)
    where
        P: RenderPipeline<Buffer = H>,
    {
        let buffer = pipeline.upload(scene);
        let vertex_count = scene.vertex_count() as u32;

        log::info!(
            "World ready: {} vertices, {} triangles",
            vertex_count,
            scene.triangle_count()
        );

        self.state = LoadState::Ready(UploadedScene {
            buffer,
            vertex_count,
        });
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    pub fn uploaded(&self) -> Option<&UploadedScene<H>> {
        match &self.state {
            LoadState::Ready(uploaded) => Some(uploaded),
            _ => None,
        }
    }

    pub fn vertex_count(&self) -> Option<u32> {
        self.uploaded().map(|uploaded| uploaded.vertex_count)
    }

    pub fn status(&self) -> LoadStatus<'_> {
        match &self.state {
            LoadState::Unloaded => LoadStatus::Unloaded,
            LoadState::Loading(_) => LoadStatus::Loading,
            LoadState::Ready(_) => LoadStatus::Ready,
            LoadState::Failed(message) => LoadStatus::Failed(message),
        }
    }

    fn failed(message: String) -> LoadState<H> {
        log::error!("World load failed: {}", message);
        LoadState::Failed(message)
    }
}

impl<H> Default for SceneBuffer<H> {
    fn default() -> Self {
        Self::new()
    }
}
