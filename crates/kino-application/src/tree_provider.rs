//! Generic tree data provider over one artifact collection.
//!
//! A provider owns the last scanned list of records and its projection into
//! [`TreeNode`]s. Watcher events and explicit refresh requests both end up in
//! [`ArtifactTreeProvider::refresh`], which never runs two scans of the same
//! collection at once: a request that arrives mid-scan is folded into a single
//! follow-up scan.

use kino_core::artifact::{ArtifactSource, Named};
use kino_core::error::Result;
use kino_core::tree::TreeNode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock, broadcast};

/// Pure function turning one record into its display node.
pub type NodeBuilder<T> = fn(&T) -> TreeNode;

struct Snapshot<T> {
    items: Vec<T>,
    nodes: Vec<TreeNode>,
}

pub struct ArtifactTreeProvider<T> {
    view: &'static str,
    source: Arc<dyn ArtifactSource<T>>,
    build_node: NodeBuilder<T>,
    snapshot: RwLock<Snapshot<T>>,
    scan_lock: Mutex<()>,
    rescan_requested: AtomicBool,
    redraw: broadcast::Sender<()>,
}

impl<T> ArtifactTreeProvider<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty provider. Call [`refresh`](Self::refresh) to populate it.
    pub fn new(view: &'static str, source: Arc<dyn ArtifactSource<T>>, build_node: NodeBuilder<T>) -> Self {
        let (redraw, _) = broadcast::channel(16);
        Self {
            view,
            source,
            build_node,
            snapshot: RwLock::new(Snapshot {
                items: Vec::new(),
                nodes: Vec::new(),
            }),
            scan_lock: Mutex::new(()),
            rescan_requested: AtomicBool::new(false),
            redraw,
        }
    }

    pub fn view(&self) -> &'static str {
        self.view
    }

    /// Re-scans the collection and signals a redraw.
    ///
    /// If a scan is already running this returns immediately and the running
    /// call performs one more scan before it finishes. On a scan error the
    /// previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<()> {
        self.rescan_requested.store(true, Ordering::SeqCst);

        loop {
            let Ok(guard) = self.scan_lock.try_lock() else {
                tracing::debug!("[{}] Scan in progress, refresh coalesced", self.view);
                return Ok(());
            };

            while self.rescan_requested.swap(false, Ordering::SeqCst) {
                self.rescan().await?;
            }
            drop(guard);

            // A request may have landed between the last swap and the unlock
            if !self.rescan_requested.load(Ordering::SeqCst) {
                return Ok(());
            }
        }
    }

    async fn rescan(&self) -> Result<()> {
        let items = match self.source.scan().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("[{}] Scan failed: {}", self.view, e);
                return Err(e);
            }
        };

        self.replace_items(items).await;
        Ok(())
    }

    async fn replace_items(&self, items: Vec<T>) {
        let nodes = items.iter().map(self.build_node).collect();
        {
            let mut snapshot = self.snapshot.write().await;
            snapshot.items = items;
            snapshot.nodes = nodes;
        }
        self.notify_redraw();
    }

    /// Applies `f` to the in-memory records, rebuilds the nodes and redraws.
    pub async fn update_items<F>(&self, f: F)
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut items = self.items().await;
        f(&mut items);
        self.replace_items(items).await;
    }

    /// Top-level nodes of the current projection.
    pub async fn roots(&self) -> Vec<TreeNode> {
        self.snapshot.read().await.nodes.clone()
    }

    /// Children of the node with `node_id`; empty for leaves and unknown ids.
    pub async fn children(&self, node_id: &str) -> Vec<TreeNode> {
        let snapshot = self.snapshot.read().await;
        snapshot
            .nodes
            .iter()
            .find_map(|node| node.find(node_id))
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    pub async fn items(&self) -> Vec<T> {
        self.snapshot.read().await.items.clone()
    }

    /// Receives `()` every time the projection changes.
    pub fn subscribe_redraw(&self) -> broadcast::Receiver<()> {
        self.redraw.subscribe()
    }

    pub fn notify_redraw(&self) {
        let _ = self.redraw.send(());
    }
}

impl<T> ArtifactTreeProvider<T>
where
    T: Named + Clone + Send + Sync + 'static,
{
    pub async fn find(&self, name: &str) -> Option<T> {
        self.snapshot
            .read()
            .await
            .items
            .iter()
            .find(|item| item.name() == name)
            .cloned()
    }
}
