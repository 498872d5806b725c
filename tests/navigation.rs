//! End-to-end navigation over an orthographic test surface

mod common;

use std::sync::Arc;

use approx::assert_relative_eq;
use common::{GatedSleeper, NoSleep, OrthoSurface};
use geonav::config::AnimationConfig;
use geonav::{
    AnimationSequence, AnimationState, CoordinateAdapter, DisplayCapabilities, GeographicPoint,
    GlobeAdapter, LatLonProjection, MapArea, RenderSurface, Transect, TransectProjector,
    ViewMatrix, ViewNavigator,
};
use nalgebra::Matrix4;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 600.0;

fn world_adapter() -> CoordinateAdapter<LatLonProjection> {
    CoordinateAdapter::new(LatLonProjection::world()).unwrap()
}

fn map_navigator(
    surface: &Arc<OrthoSurface>,
) -> ViewNavigator<CoordinateAdapter<LatLonProjection>> {
    ViewNavigator::new(
        surface.clone() as Arc<dyn RenderSurface>,
        world_adapter(),
        DisplayCapabilities::flat(),
        AnimationSequence::new(),
    )
    .with_sleeper(Arc::new(NoSleep))
}

fn assert_center_shows(
    navigator: &mut ViewNavigator<CoordinateAdapter<LatLonProjection>>,
    latitude: f64,
    longitude: f64,
) {
    let shown = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(shown.latitude, latitude, epsilon = 1e-9);
    assert_relative_eq!(shown.longitude, longitude, epsilon = 1e-9);
}

#[test]
fn test_immediate_center() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);

    let handle = navigator
        .center(&GeographicPoint::surface(45.0, 90.0), false)
        .unwrap();
    assert!(handle.is_none());
    assert_eq!(surface.applied().len(), 1);
    assert_center_shows(&mut navigator, 45.0, 90.0);
}

#[test]
fn test_center_on_missing_point_is_ignored() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);

    let missing = GeographicPoint::new(f64::NAN, 10.0, 0.0);
    assert!(navigator.center(&missing, false).unwrap().is_none());
    assert!(navigator.center(&missing, true).unwrap().is_none());
    assert!(surface.applied().is_empty());
}

#[test]
fn test_zoom() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let navigator = map_navigator(&surface);

    assert!(navigator.zoom(2.0));
    assert_relative_eq!(navigator.scale(), 2.0, epsilon = 1e-12);

    assert!(!navigator.zoom(0.0));
    assert_relative_eq!(navigator.scale(), 2.0, epsilon = 1e-12);
    assert_eq!(surface.applied().len(), 1);
}

#[test]
fn test_center_and_zoom() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);

    navigator
        .center_and_zoom(&GeographicPoint::surface(45.0, 90.0), 2.0, false)
        .unwrap();
    assert_relative_eq!(navigator.scale(), 2.0, epsilon = 1e-12);
    assert_center_shows(&mut navigator, 45.0, 90.0);
}

#[test]
fn test_animate_to_reaches_target() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);
    let target = ViewMatrix::translation(1.0, 0.0, 0.0);

    let handle = navigator.animate_to(target, None).unwrap();
    assert_eq!(handle.steps(), 20);
    assert_eq!(handle.wait().unwrap(), AnimationState::Completed);

    assert_eq!(surface.view_matrix(), target);
    assert_eq!(surface.applied().len(), 20);
    assert!(!navigator.is_animating());
}

#[test]
fn test_large_moves_take_more_steps() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);

    let handle = navigator.animate_to(ViewMatrix::scaling(10.0), None).unwrap();
    assert_eq!(handle.steps(), 100);
    assert_eq!(handle.wait().unwrap(), AnimationState::Completed);
    assert_relative_eq!(navigator.scale(), 10.0, epsilon = 1e-12);
}

#[test]
fn test_animate_to_recenters_on_final_location() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);
    let point = GeographicPoint::surface(45.0, 90.0);

    let handle = navigator
        .animate_to(ViewMatrix::scaling(2.0), Some(&point))
        .unwrap();
    assert_eq!(handle.wait().unwrap(), AnimationState::Completed);
    assert_relative_eq!(navigator.scale(), 2.0, epsilon = 1e-12);
    assert_center_shows(&mut navigator, 45.0, 90.0);
}

#[test]
fn test_animated_center() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);

    let handle = navigator
        .center(&GeographicPoint::surface(-30.0, -60.0), true)
        .unwrap()
        .expect("animation should start");
    assert_eq!(handle.wait().unwrap(), AnimationState::Completed);
    assert_center_shows(&mut navigator, -30.0, -60.0);
}

#[test]
fn test_newer_animation_supersedes_older() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let (sleeper, entered, release) = GatedSleeper::new();
    let mut navigator = map_navigator(&surface).with_sleeper(sleeper);

    let first = navigator
        .animate_to(ViewMatrix::translation(2.0, 0.0, 0.0), None)
        .unwrap();
    entered.recv().unwrap();

    let before_second = surface.applied().len();
    assert_eq!(before_second, 1);

    let target = ViewMatrix::translation(0.0, -1.0, 0.0);
    let second = navigator.animate_to(target, None).unwrap();
    assert!(second.token() > first.token());
    let second_steps = second.steps();
    drop(release);

    assert_eq!(first.wait().unwrap(), AnimationState::Superseded);
    assert_eq!(second.wait().unwrap(), AnimationState::Completed);
    assert_eq!(surface.view_matrix(), target);

    // The first animation only ever moves along x, the second always moves
    // down, so every matrix after the second request must come from it.
    let applied = surface.applied();
    assert_eq!(applied[0].matrix()[(1, 3)], 0.0);
    assert!(applied[0].matrix()[(0, 3)] > 0.0);
    assert_eq!(applied.len(), before_second + second_steps);
    assert!(applied[before_second..]
        .iter()
        .all(|m| m.matrix()[(1, 3)] < 0.0));
}

#[test]
fn test_shared_sequence_cancels_across_navigators() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let sequence = AnimationSequence::new();
    let (sleeper, entered, release) = GatedSleeper::new();

    let mut animating = ViewNavigator::new(
        surface.clone() as Arc<dyn RenderSurface>,
        world_adapter(),
        DisplayCapabilities::flat(),
        sequence.clone(),
    )
    .with_sleeper(sleeper);
    let other = ViewNavigator::new(
        surface.clone() as Arc<dyn RenderSurface>,
        world_adapter(),
        DisplayCapabilities::flat(),
        sequence,
    );

    let handle = animating
        .animate_to(ViewMatrix::scaling(4.0), None)
        .unwrap();
    entered.recv().unwrap();
    assert!(animating.is_animating());

    assert!(other.zoom(0.5));
    let zoomed = surface.view_matrix();
    drop(release);

    assert_eq!(handle.wait().unwrap(), AnimationState::Superseded);
    assert!(!animating.is_animating());
    assert_eq!(surface.view_matrix(), zoomed);
}

#[test]
fn test_non_invertible_steps_are_skipped() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);
    let mirror = ViewMatrix::from_matrix(Matrix4::from_diagonal(&nalgebra::Vector4::new(
        -1.0, 1.0, 1.0, 1.0,
    )));

    let handle = navigator.animate_to(mirror, None).unwrap();
    let steps = handle.steps();
    assert_eq!(steps % 2, 0);
    assert_eq!(handle.wait().unwrap(), AnimationState::Completed);

    let applied = surface.applied();
    assert_eq!(applied.len(), steps - 1);
    assert!(applied.iter().all(|m| m.is_invertible()));
    assert_eq!(surface.view_matrix(), mirror);
}

#[test]
fn test_lat_lon_box_of_world_map() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);

    let bbox = navigator.lat_lon_box().unwrap();
    assert_relative_eq!(bbox.min_latitude, -90.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.max_latitude, 90.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.min_longitude, -180.0, epsilon = 1e-9);
    assert_relative_eq!(bbox.max_longitude, 180.0, epsilon = 1e-9);

    navigator.zoom(4.0);
    let zoomed = navigator.lat_lon_box().unwrap();
    assert_relative_eq!(zoomed.max_latitude, 22.5, epsilon = 1e-9);
    assert_relative_eq!(zoomed.max_longitude, 45.0, epsilon = 1e-9);
}

#[test]
fn test_replace_transform() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = map_navigator(&surface);

    assert!(!navigator.replace_transform(world_adapter()));

    let europe = LatLonProjection::new(MapArea::new(-10.0, 35.0, 50.0, 35.0).unwrap());
    assert!(navigator.replace_transform(CoordinateAdapter::new(europe).unwrap()));
    let center = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(center.latitude, 52.5, epsilon = 1e-9);
    assert_relative_eq!(center.longitude, 15.0, epsilon = 1e-9);
}

#[test]
fn test_transect_navigation() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let transect = Transect::from_lat_lon(&[(0.0, 0.0), (0.0, 10.0)]).unwrap();
    let mut navigator = ViewNavigator::new(
        surface.clone() as Arc<dyn RenderSurface>,
        TransectProjector::new(transect),
        DisplayCapabilities::flat(),
        AnimationSequence::new(),
    );

    let middle = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(middle.latitude, 0.0, epsilon = 1e-9);
    assert_relative_eq!(middle.longitude, 5.0, epsilon = 1e-6);

    navigator
        .center(&GeographicPoint::surface(0.0, 2.5), false)
        .unwrap();
    let centered = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(centered.longitude, 2.5, epsilon = 1e-6);
}

#[test]
fn test_globe_readout() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = ViewNavigator::new(
        surface.clone() as Arc<dyn RenderSurface>,
        GlobeAdapter::default(),
        DisplayCapabilities::volumetric(),
        AnimationSequence::new(),
    );

    let pole = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(pole.latitude, 90.0, epsilon = 1e-9);
    assert_relative_eq!(pole.altitude, 0.0, epsilon = 1e-6);

    let corner = navigator.screen_to_earth(0.0, 0.0, None);
    assert!(corner.is_missing());
}

#[test]
fn test_invalid_pacing_is_rejected() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    for config in [
        AnimationConfig {
            max_displacement: 0.5,
            ..AnimationConfig::default()
        },
        AnimationConfig {
            base_steps: 50,
            max_steps: 10,
            ..AnimationConfig::default()
        },
        AnimationConfig {
            base_steps: 0,
            max_steps: 0,
            ..AnimationConfig::default()
        },
    ] {
        assert!(map_navigator(&surface).with_config(config).is_err());
    }
    assert!(surface.applied().is_empty());
}

#[test]
fn test_custom_pacing_reaches_target() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let config = AnimationConfig {
        base_steps: 1,
        max_steps: 4,
        max_displacement: 4.0,
        step_delay_ms: 0,
    };
    let mut navigator = map_navigator(&surface).with_config(config).unwrap();

    let target = ViewMatrix::scaling(2.0);
    let handle = navigator.animate_to(target, None).unwrap();
    assert!(handle.steps() >= 1 && handle.steps() <= 4);
    assert_eq!(handle.wait().unwrap(), AnimationState::Completed);
    assert_eq!(surface.view_matrix(), target);
}

fn globe_navigator(surface: &Arc<OrthoSurface>) -> ViewNavigator<GlobeAdapter> {
    ViewNavigator::new(
        surface.clone() as Arc<dyn RenderSurface>,
        GlobeAdapter::default(),
        DisplayCapabilities::volumetric(),
        AnimationSequence::new(),
    )
    .with_sleeper(Arc::new(NoSleep))
}

#[test]
fn test_globe_center_turns_far_side_to_front() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = globe_navigator(&surface);

    navigator
        .center(&GeographicPoint::surface(-90.0, 0.0), false)
        .unwrap();
    let shown = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(shown.latitude, -90.0, epsilon = 1e-9);
    assert_relative_eq!(navigator.scale(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_globe_center_rotates_instead_of_sliding() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = globe_navigator(&surface);

    navigator
        .center(&GeographicPoint::surface(0.0, 0.0), false)
        .unwrap();
    let (roll, pitch, yaw) = navigator.rotation_degrees();
    assert!(roll.abs() + pitch.abs() + yaw.abs() > 1.0);

    let view = surface.view_matrix();
    assert_relative_eq!(view.matrix()[(0, 3)], 0.0, epsilon = 1e-12);
    assert_relative_eq!(view.matrix()[(1, 3)], 0.0, epsilon = 1e-12);

    let shown = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(shown.latitude, 0.0, epsilon = 1e-9);
    assert_relative_eq!(shown.longitude, 0.0, epsilon = 1e-9);
}

#[test]
fn test_globe_animated_center_and_zoom() {
    let surface = OrthoSurface::new(WIDTH, HEIGHT);
    let mut navigator = globe_navigator(&surface);

    let handle = navigator
        .center(&GeographicPoint::surface(30.0, 60.0), true)
        .unwrap()
        .expect("animation should start");
    assert_eq!(handle.wait().unwrap(), AnimationState::Completed);
    let shown = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(shown.latitude, 30.0, epsilon = 1e-6);
    assert_relative_eq!(shown.longitude, 60.0, epsilon = 1e-6);

    navigator
        .center_and_zoom(&GeographicPoint::surface(-20.0, 100.0), 2.0, false)
        .unwrap();
    assert_relative_eq!(navigator.scale(), 2.0, epsilon = 1e-9);
    let shown = navigator.screen_to_earth(WIDTH / 2.0, HEIGHT / 2.0, None);
    assert_relative_eq!(shown.latitude, -20.0, epsilon = 1e-6);
    assert_relative_eq!(shown.longitude, 100.0, epsilon = 1e-6);
}
