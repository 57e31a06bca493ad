use std::sync::Arc;

use stegvault::storage::{ArtifactStore, FileArtifactStore, MemoryArtifactStore, StegoArtifact};
use stegvault::StegoError;

/// An artifact whose bytes are all `tag`, so a torn read would show mixed bytes.
fn uniform(tag: u8, len: usize) -> StegoArtifact {
    StegoArtifact::new(vec![tag; len])
}

async fn hammer(store: Arc<dyn ArtifactStore>) {
    store.put(uniform(0, 64 * 1024)).await.unwrap();

    let mut handles = Vec::new();
    for writer in 1..=8u8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for _ in 0..10 {
                store.put(uniform(writer, 64 * 1024)).await.unwrap();
            }
        }));
    }
    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for _ in 0..20 {
                let artifact = store.get().await.unwrap();
                let bytes = artifact.as_bytes();
                assert_eq!(bytes.len(), 64 * 1024);
                assert!(bytes.iter().all(|&b| b == bytes[0]), "torn artifact observed");
            }
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_store_never_tears() {
    hammer(Arc::new(MemoryArtifactStore::new())).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_file_store_never_tears() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileArtifactStore::open(dir.path().join("stego.png"), false)
        .await
        .unwrap();
    hammer(Arc::new(store)).await;
}

#[tokio::test]
async fn test_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let stores: Vec<Arc<dyn ArtifactStore>> = vec![
        Arc::new(MemoryArtifactStore::new()),
        Arc::new(
            FileArtifactStore::open(dir.path().join("slot.png"), false)
                .await
                .unwrap(),
        ),
    ];

    for store in stores {
        assert!(matches!(store.get().await, Err(StegoError::NotFound)));
        store.put(uniform(1, 10)).await.unwrap();
        store.put(uniform(2, 20)).await.unwrap();
        assert_eq!(store.get().await.unwrap(), uniform(2, 20));
    }
}
