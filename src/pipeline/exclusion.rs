use std::sync::Arc;

use tokio::sync::Mutex;

/// Songs that must not be suggested again during one playlist run.
///
/// Holds "song by artist" labels. Clones share the same list; entries are
/// only ever appended. Readers work on snapshots, so two tasks may search
/// with slightly different lists.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    inner: Arc<Mutex<Vec<String>>>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `label` unless it is already listed.
    pub async fn push(&self, label: impl Into<String>) {
        let label = label.into();
        let mut list = self.inner.lock().await;
        if !list.contains(&label) {
            list.push(label);
        }
    }

    pub async fn snapshot(&self) -> Vec<String> {
        self.inner.lock().await.clone()
    }

    pub async fn contains(&self, label: &str) -> bool {
        self.inner.lock().await.iter().any(|l| l == label)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let set = ExclusionSet::new();
        let other = set.clone();

        set.push("Otis by JAY-Z").await;
        other.push("Gotta Have It by JAY-Z").await;

        assert_eq!(
            set.snapshot().await,
            vec!["Otis by JAY-Z", "Gotta Have It by JAY-Z"]
        );
    }

    #[tokio::test]
    async fn test_duplicate_labels_are_kept_once() {
        let set = ExclusionSet::new();
        set.push("Otis by JAY-Z").await;
        set.push("Otis by JAY-Z").await;
        assert_eq!(set.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_pushes_are_all_recorded() {
        let set = ExclusionSet::new();
        let mut handles = Vec::new();
        for i in 0..32 {
            let set = set.clone();
            handles.push(tokio::spawn(async move {
                set.push(format!("Song {} by Artist", i)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(set.len().await, 32);
        assert!(set.contains("Song 17 by Artist").await);
    }

    #[tokio::test]
    async fn test_snapshot_is_detached() {
        let set = ExclusionSet::new();
        set.push("A by B").await;
        let snapshot = set.snapshot().await;
        set.push("C by D").await;
        assert_eq!(snapshot.len(), 1);
    }
}
