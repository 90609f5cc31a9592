//! Deferred model loading
//!
//! Imported entities enter the store immediately as flagged placeholders;
//! the actual mesh load runs on a worker and completes through a channel
//! drained once per frame. A failed load keeps the placeholder in the store
//! with id and transform intact, it never removes the entity.

use std::sync::Arc;

use tokio::sync::mpsc;

use shared::ObjectId;

use crate::mesh::{MeshData, PLACEHOLDER_COLOR};
use crate::state::scene::SceneStore;

/// Asset loader collaborator. Implementations parse a model file into mesh
/// buffers; format support lives entirely outside the core.
pub trait ModelLoader: Send + Sync + 'static {
    fn load(&self, path: &str) -> Result<MeshData, String>;
}

struct LoadCompletion {
    entity_id: ObjectId,
    path: String,
    result: Result<MeshData, String>,
}

/// Bridges worker-side load completions into the single-writer frame loop.
/// All store mutations happen in `drain`, on the caller's thread.
pub struct AssetBridge {
    runtime: tokio::runtime::Runtime,
    tx: mpsc::UnboundedSender<LoadCompletion>,
    rx: mpsc::UnboundedReceiver<LoadCompletion>,
    in_flight: usize,
}

impl AssetBridge {
    pub fn new() -> Result<Self, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("asset-loader")
            .build()
            .map_err(|e| format!("asset runtime: {e}"))?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            tx,
            rx,
            in_flight: 0,
        })
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Kick off a load for an entity already present as a placeholder
    pub fn request(&mut self, loader: Arc<dyn ModelLoader>, entity_id: &str, path: &str) {
        let tx = self.tx.clone();
        let entity_id = entity_id.to_string();
        let path = path.to_string();
        self.in_flight += 1;
        tracing::info!("loading model '{}'", path);

        self.runtime.spawn_blocking(move || {
            let result = loader.load(&path);
            // Receiver dropped means the editor is shutting down
            let _ = tx.send(LoadCompletion {
                entity_id,
                path,
                result,
            });
        });
    }

    /// Apply every completion received since the last frame.
    /// Returns the number of completions applied.
    pub fn drain(&mut self, store: &mut SceneStore) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            applied += 1;

            let Some(entity) = store.get_entity_mut(&done.entity_id) else {
                // Entity was deleted while the load was pending
                continue;
            };
            match done.result {
                Ok(mesh) => {
                    entity.mesh = mesh;
                    entity.placeholder = false;
                    tracing::info!("model '{}' resolved", done.path);
                }
                Err(err) => {
                    // Keep the placeholder, repaint it the distinct color
                    for i in 0..entity.mesh.vertex_count() {
                        entity.mesh.set_color(i, PLACEHOLDER_COLOR);
                    }
                    entity.placeholder = true;
                    tracing::warn!("model '{}' failed to load: {}", done.path, err);
                }
            }
            store.notify_mutated();
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh;
    use shared::GeometryParamRecord;

    struct StubLoader {
        fail: bool,
    }

    impl ModelLoader for StubLoader {
        fn load(&self, _path: &str) -> Result<MeshData, String> {
            if self.fail {
                Err("unsupported format".to_string())
            } else {
                Ok(mesh::cuboid(2.0, 2.0, 2.0, mesh::DEFAULT_COLOR))
            }
        }
    }

    fn store_with_pending() -> (SceneStore, ObjectId) {
        let mut store = SceneStore::default();
        let id = store.add_object(
            "Imported",
            GeometryParamRecord::Imported {
                model_path: "models/chair.glb".to_string(),
                original_name: "chair".to_string(),
                original_scale: [1.0, 1.0, 1.0],
            },
        );
        (store, id)
    }

    fn drain_until(bridge: &mut AssetBridge, store: &mut SceneStore) -> usize {
        for _ in 0..200 {
            let n = bridge.drain(store);
            if n > 0 {
                return n;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        0
    }

    #[test]
    fn test_successful_load_replaces_mesh() {
        let (mut store, id) = store_with_pending();
        let mut bridge = AssetBridge::new().unwrap();
        bridge.request(Arc::new(StubLoader { fail: false }), &id, "models/chair.glb");

        assert_eq!(drain_until(&mut bridge, &mut store), 1);
        let entity = store.get_entity(&id).unwrap();
        assert!(!entity.placeholder);
        assert_eq!(entity.mesh.vertex_count(), 24);
        assert_eq!(bridge.in_flight(), 0);
    }

    #[test]
    fn test_failed_load_keeps_flagged_placeholder() {
        let (mut store, id) = store_with_pending();
        let transform_before = store.get_entity(&id).unwrap().transform.clone();

        let mut bridge = AssetBridge::new().unwrap();
        bridge.request(Arc::new(StubLoader { fail: true }), &id, "models/chair.glb");

        assert_eq!(drain_until(&mut bridge, &mut store), 1);
        let entity = store.get_entity(&id).unwrap();
        assert!(entity.placeholder);
        assert_eq!(entity.id, id);
        assert_eq!(entity.transform, transform_before);
        assert!(entity.mesh.vertex_count() > 0);
    }

    #[test]
    fn test_completion_for_deleted_entity_is_dropped() {
        let (mut store, id) = store_with_pending();
        let mut bridge = AssetBridge::new().unwrap();
        bridge.request(Arc::new(StubLoader { fail: false }), &id, "models/chair.glb");
        store.remove_object(&id);

        assert_eq!(drain_until(&mut bridge, &mut store), 1);
        assert!(store.get_entity(&id).is_none());
    }
}
