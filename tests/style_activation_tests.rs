use mapnav::prelude::*;
use mapnav::runtime::spawners::{InlineSpawner, ThreadSpawner};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Style switching as the host sees it: requests go in through the
/// controller, results come back on the interactive thread via `frame`
#[cfg(test)]
mod style_activation_tests {
    use super::*;

    /// Temp file removed on drop
    struct DatasetFile(PathBuf);

    impl DatasetFile {
        fn create(name: &str, contents: &[u8]) -> Self {
            let path = std::env::temp_dir().join(format!(
                "mapnav-{}-{}.obf",
                name,
                std::process::id()
            ));
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(contents).unwrap();
            Self(path)
        }
    }

    impl Drop for DatasetFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn config_with_dataset(path: PathBuf) -> MapViewConfig {
        let mut config = MapViewConfig::default();
        config.styles.offline_dataset_path = path;
        config
    }

    fn session(
        config: MapViewConfig,
        spawner: Arc<dyn TaskSpawner>,
    ) -> MapViewController<HeadlessEngine> {
        let loader = Arc::new(CatalogLoader::new(config.styles.clone()));
        MapViewController::with_runtime(config, HeadlessEngine::new(), loader, spawner).unwrap()
    }

    fn record_events(map: &MapViewController<HeadlessEngine>) -> Arc<Mutex<Vec<ActivationEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        map.activation_observable()
            .subscribe(move |event: &ActivationEvent| sink.lock().unwrap().push(event.clone()));
        seen
    }

    /// Runs frames until nothing is pending, the way a display link would
    async fn settle(map: &mut MapViewController<HeadlessEngine>) {
        for _ in 0..500 {
            map.frame();
            if map.pending_style().is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        panic!("activation never completed");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_switch_between_online_providers() {
        let mut map = session(MapViewConfig::default(), runtime());
        let seen = record_events(&map);

        assert!(matches!(
            map.activate_provider_b(),
            ActivationStatus::Pending { .. }
        ));
        settle(&mut map).await;

        assert_eq!(map.active_style(), StyleId::OnlineRasterProviderB);
        assert_eq!(map.engine().released(), &[StyleId::OnlineRasterProviderA]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![ActivationEvent::Activated(StyleId::OnlineRasterProviderB)]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_activate_offline_dataset() {
        let dataset = DatasetFile::create("present", b"offline vector data");
        let mut map = session(config_with_dataset(dataset.0.clone()), runtime());

        map.activate_offline_dataset();
        settle(&mut map).await;

        assert_eq!(map.active_style(), StyleId::OfflineVectorDataset);
        assert_eq!(map.engine().active_style(), Some(StyleId::OfflineVectorDataset));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_dataset_keeps_previous_style() {
        let path = std::env::temp_dir().join("mapnav-definitely-missing-dataset.obf");
        let mut map = session(config_with_dataset(path), runtime());
        let seen = record_events(&map);

        map.activate_offline_dataset();
        settle(&mut map).await;

        assert_eq!(map.active_style(), StyleId::OnlineRasterProviderA);
        // The engine was never without a style, and never saw the failed one.
        assert_eq!(map.engine().style_history(), &[StyleId::OnlineRasterProviderA]);
        assert!(map.engine().released().is_empty());
        assert!(matches!(
            seen.lock().unwrap().as_slice(),
            [ActivationEvent::Failed {
                style: StyleId::OfflineVectorDataset,
                ..
            }]
        ));
    }

    #[test]
    fn test_empty_dataset_reported_as_failure() {
        let dataset = DatasetFile::create("empty", b"");
        let mut map = session(config_with_dataset(dataset.0.clone()), Arc::new(InlineSpawner));
        let seen = record_events(&map);

        map.activate_offline_dataset();
        map.frame();

        assert_eq!(map.active_style(), StyleId::OnlineRasterProviderA);
        let events = seen.lock().unwrap();
        match events.as_slice() {
            [ActivationEvent::Failed { reason, .. }] => assert!(reason.contains("empty")),
            other => panic!("unexpected events {:?}", other),
        }
    }

    #[test]
    fn test_latest_request_wins() {
        let dataset = DatasetFile::create("latest", b"offline vector data");
        let mut map = session(
            config_with_dataset(dataset.0.clone()),
            Arc::new(ThreadSpawner),
        );
        let seen = record_events(&map);

        map.activate_offline_dataset();
        map.activate_provider_b();
        for _ in 0..500 {
            map.frame();
            if map.pending_style().is_none() {
                break;
            }
            std::thread::sleep(Duration::from_millis(2));
        }

        assert_eq!(map.active_style(), StyleId::OnlineRasterProviderB);
        assert!(!map
            .engine()
            .style_history()
            .contains(&StyleId::OfflineVectorDataset));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                ActivationEvent::Superseded(StyleId::OfflineVectorDataset),
                ActivationEvent::Activated(StyleId::OnlineRasterProviderB),
            ]
        );
    }

    #[test]
    fn test_reactivating_current_style_succeeds() {
        let mut map = session(MapViewConfig::default(), Arc::new(InlineSpawner));
        assert_eq!(map.activate_provider_a(), ActivationStatus::AlreadyActive);
        map.frame();
        assert_eq!(map.engine().style_history(), &[StyleId::OnlineRasterProviderA]);
    }

    #[test]
    fn test_offline_initial_style_requires_dataset() {
        let mut config = config_with_dataset("/nonexistent/mapnav/world.obf".into());
        config.initial_style = StyleId::OfflineVectorDataset;
        let loader = Arc::new(CatalogLoader::new(config.styles.clone()));
        let result = MapViewController::with_runtime(
            config,
            HeadlessEngine::new(),
            loader,
            Arc::new(InlineSpawner),
        );
        assert!(matches!(result, Err(MapError::DatasetMissing(_))));
    }
}
