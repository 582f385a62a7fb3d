use mapnav::prelude::*;
use mapnav::runtime::spawners::InlineSpawner;
use std::sync::Mutex;

/// Integration tests driving a full map view session through the
/// controller, the way a hosting view would
#[cfg(test)]
mod map_view_tests {
    use super::*;

    fn session(config: MapViewConfig) -> MapViewController<HeadlessEngine> {
        let loader = Arc::new(CatalogLoader::new(config.styles.clone()));
        MapViewController::with_runtime(config, HeadlessEngine::new(), loader, Arc::new(InlineSpawner))
            .expect("online initial style needs no I/O")
    }

    fn linear_session() -> MapViewController<HeadlessEngine> {
        let mut config = MapViewConfig::default();
        config.animation.easing = EasingFunction::Linear;
        session(config)
    }

    fn record_azimuths(map: &MapViewController<HeadlessEngine>) -> Arc<Mutex<Vec<f64>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        map.azimuth_observable().subscribe(move |azimuth: &f64| {
            sink.lock().unwrap().push(*azimuth);
        });
        seen
    }

    fn rotate(phase: GesturePhase, rotation: f64) -> GestureEvent {
        GestureEvent::Rotate {
            phase,
            rotation,
            touches: 2,
        }
    }

    #[test]
    fn test_session_starts_with_style_and_camera() {
        let map = session(MapViewConfig::default());
        assert_eq!(map.active_style(), StyleId::OnlineRasterProviderA);
        assert_eq!(map.engine().active_style(), Some(StyleId::OnlineRasterProviderA));
        assert_eq!(map.engine().frame_count(), 1);
        assert_eq!(map.camera().azimuth(), 0.0);
    }

    #[test]
    fn test_frame_forwards_camera() -> anyhow::Result<()> {
        let mut map = linear_session();
        map.rotate_to(45.0);
        map.set_zoom(12.0);
        map.set_tilt(30.0);
        map.frame();

        let camera = map.engine().last_camera().ok_or_else(|| anyhow::anyhow!("no frame"))?;
        assert_eq!(camera.azimuth(), 45.0);
        assert_eq!(camera.zoom(), 12.0);
        assert_eq!(camera.tilt(), 30.0);
        assert_eq!(map.engine().frame_count(), 2);
        Ok(())
    }

    #[test]
    fn test_animated_alignment_reaches_north() {
        let mut map = linear_session();
        let seen = record_azimuths(&map);
        map.rotate_to(10.0);

        let start = Instant::now();
        let outcome = map.align_azimuth_to_north(Duration::from_millis(200), start);
        assert_eq!(outcome, AlignOutcome::Started(RotationDirection::CounterClockwise));

        map.frame_at(start + Duration::from_millis(100));
        assert!((map.camera().azimuth() - 5.0).abs() < 1e-6);

        map.frame_at(start + Duration::from_millis(250));
        assert!(!map.is_aligning());
        assert_eq!(map.camera().azimuth(), 0.0);
        assert_eq!(map.engine().last_camera().unwrap().azimuth(), 0.0);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&10.0));
        assert_eq!(seen.last(), Some(&0.0));
        assert!(seen.iter().all(|a| (0.0..360.0).contains(a)));
    }

    #[test]
    fn test_default_alignment_uses_configured_duration() {
        let mut map = session(MapViewProfile::Reduced.resolve());
        map.rotate_to(200.0);
        assert_eq!(map.animated_align_azimuth_to_north(), AlignOutcome::Completed);
        assert_eq!(map.camera().azimuth(), 0.0);
    }

    #[test]
    fn test_rotate_gesture_cancels_alignment() {
        let mut map = linear_session();
        let seen = record_azimuths(&map);
        map.rotate_to(90.0);

        let start = Instant::now();
        map.align_azimuth_to_north(Duration::from_millis(200), start);
        map.frame_at(start + Duration::from_millis(50));
        let mid_animation = map.camera().azimuth();

        map.handle_gesture(&rotate(GesturePhase::Began, 0.0));
        let response = map.handle_gesture(&rotate(GesturePhase::Changed, 15.0));
        assert_eq!(response, GestureResponse::Rotate(15.0));
        assert!(!map.is_aligning());
        assert!((map.camera().azimuth() - (mid_animation + 15.0)).abs() < 1e-6);

        // Later frames leave the gesture-set azimuth alone.
        let before = seen.lock().unwrap().len();
        map.frame_at(start + Duration::from_millis(150));
        assert!((map.camera().azimuth() - (mid_animation + 15.0)).abs() < 1e-6);
        assert_eq!(seen.lock().unwrap().len(), before);
    }

    #[test]
    fn test_rotate_touch_down_stops_alignment() {
        let mut map = linear_session();
        map.rotate_to(90.0);

        let start = Instant::now();
        map.align_azimuth_to_north(Duration::from_millis(200), start);
        map.frame_at(start + Duration::from_millis(50));
        let held = map.camera().azimuth();

        assert_eq!(
            map.handle_gesture(&rotate(GesturePhase::Began, 0.0)),
            GestureResponse::Began(GestureKind::Rotate)
        );
        assert!(!map.is_aligning());

        map.frame_at(start + Duration::from_millis(150));
        assert_eq!(map.camera().azimuth(), held);
    }

    #[test]
    fn test_rotation_below_threshold_stops_alignment() {
        let mut config = MapViewConfig::default();
        config.animation.easing = EasingFunction::Linear;
        config.gestures.rotation_threshold_deg = 10.0;
        let mut map = session(config);
        map.rotate_to(90.0);

        map.handle_gesture(&rotate(GesturePhase::Began, 0.0));
        let start = Instant::now();
        map.align_azimuth_to_north(Duration::from_millis(200), start);
        map.frame_at(start + Duration::from_millis(50));
        let held = map.camera().azimuth();

        assert_eq!(
            map.handle_gesture(&rotate(GesturePhase::Changed, 2.0)),
            GestureResponse::Recognizing(GestureKind::Rotate)
        );
        assert!(!map.is_aligning());

        map.frame_at(start + Duration::from_millis(150));
        assert_eq!(map.camera().azimuth(), held);
    }

    #[test]
    fn test_rotate_gesture_notifies_normalized_azimuth() {
        let mut map = linear_session();
        let seen = record_azimuths(&map);

        map.handle_gesture(&rotate(GesturePhase::Began, 0.0));
        map.handle_gesture(&rotate(GesturePhase::Changed, -30.0));
        assert_eq!(*seen.lock().unwrap(), vec![330.0]);
    }

    #[test]
    fn test_pinch_multiplies_zoom_within_bounds() {
        let mut map = linear_session();
        map.set_zoom(4.0);

        let pinch = |phase, scale| GestureEvent::Pinch {
            phase,
            scale,
            touches: 2,
        };
        map.handle_gesture(&pinch(GesturePhase::Began, 1.0));
        map.handle_gesture(&pinch(GesturePhase::Changed, 2.0));
        assert_eq!(map.camera().zoom(), 8.0);

        map.handle_gesture(&pinch(GesturePhase::Changed, 100.0));
        assert_eq!(map.camera().zoom(), map.camera().bounds().max_zoom);
    }

    #[test]
    fn test_pan_follows_rotation() {
        let swipe = |azimuth: f64| {
            let mut map = linear_session();
            map.rotate_to(azimuth);
            let pan = |phase, x| GestureEvent::Pan {
                phase,
                translation: Point::new(x, 0.0),
                touches: 1,
            };
            map.handle_gesture(&pan(GesturePhase::Began, 0.0));
            map.handle_gesture(&pan(GesturePhase::Changed, 64.0));
            map.camera().pan()
        };

        let north_up = swipe(0.0);
        let east_up = swipe(90.0);
        assert!(north_up.x > 0.0 && north_up.y.abs() < 1e-9);
        assert!(east_up.x.abs() < 1e-9);
        assert!((east_up.y + north_up.x).abs() < 1e-9);
    }

    #[test]
    fn test_unsubscribe_inside_notify() {
        let mut map = linear_session();
        let calls = Arc::new(Mutex::new(0));
        let own_id: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let observable = map.azimuth_observable().clone();
        let counter = Arc::clone(&calls);
        let slot = Arc::clone(&own_id);
        let id = map.azimuth_observable().subscribe(move |_| {
            *counter.lock().unwrap() += 1;
            if let Some(id) = *slot.lock().unwrap() {
                observable.unsubscribe(id);
            }
        });
        *own_id.lock().unwrap() = Some(id);

        map.rotate_to(10.0);
        map.rotate_to(20.0);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_cancel_gestures_on_interruption() {
        let mut map = linear_session();
        map.handle_gesture(&rotate(GesturePhase::Began, 0.0));
        map.cancel_gestures();
        assert_eq!(
            map.handle_gesture(&rotate(GesturePhase::Changed, 10.0)),
            GestureResponse::Ignored
        );
        map.frame();
        assert_eq!(
            map.handle_gesture(&rotate(GesturePhase::Began, 0.0)),
            GestureResponse::Began(GestureKind::Rotate)
        );
    }
}
