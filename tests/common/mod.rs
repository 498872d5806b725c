//! Shared fixtures for the navigation integration tests

#![allow(dead_code)]

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use geonav::navigation::{Ray, ScreenBounds, Sleeper};
use geonav::{RenderSurface, ViewMatrix};
use nalgebra::{Point3, Vector3};

/// Orthographic surface looking down the z axis
///
/// The view matrix maps display space to normalized device coordinates and
/// the screen covers NDC `[-1, 1]` on both axes.
#[derive(Debug)]
pub struct OrthoSurface {
    bounds: ScreenBounds,
    current: Mutex<ViewMatrix>,
    applied: Mutex<Vec<ViewMatrix>>,
}

impl OrthoSurface {
    pub fn new(width: f64, height: f64) -> Arc<Self> {
        Arc::new(OrthoSurface {
            bounds: ScreenBounds::new(width, height),
            current: Mutex::new(ViewMatrix::identity()),
            applied: Mutex::new(Vec::new()),
        })
    }

    /// Every matrix applied so far, oldest first
    pub fn applied(&self) -> Vec<ViewMatrix> {
        self.applied.lock().unwrap().clone()
    }

    pub fn set_view(&self, matrix: ViewMatrix) {
        *self.current.lock().unwrap() = matrix;
    }
}

impl RenderSurface for OrthoSurface {
    fn screen_bounds(&self) -> ScreenBounds {
        self.bounds
    }

    fn find_ray(&self, screen_x: f64, screen_y: f64) -> Ray {
        let nx = 2.0 * screen_x / self.bounds.width - 1.0;
        let ny = 1.0 - 2.0 * screen_y / self.bounds.height;
        match self.view_matrix().inverse() {
            Some(inverse) => Ray::new(
                inverse.transform_point(&Point3::new(nx, ny, 2.0)),
                inverse.matrix().transform_vector(&Vector3::new(0.0, 0.0, -1.0)),
            ),
            None => Ray::new(
                Point3::new(f64::NAN, f64::NAN, f64::NAN),
                Vector3::new(f64::NAN, f64::NAN, f64::NAN),
            ),
        }
    }

    fn view_matrix(&self) -> ViewMatrix {
        *self.current.lock().unwrap()
    }

    fn apply_view_matrix(&self, matrix: &ViewMatrix) {
        *self.current.lock().unwrap() = *matrix;
        self.applied.lock().unwrap().push(*matrix);
    }
}

/// Never pauses
#[derive(Debug, Default)]
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}

/// Blocks every pause until the test releases it
///
/// Each call reports on the `entered` channel before blocking. Dropping the
/// release sender lets all current and future pauses through.
pub struct GatedSleeper {
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl GatedSleeper {
    /// Returns the sleeper, the entered notifications and the release sender
    pub fn new() -> (Arc<Self>, Receiver<()>, Sender<()>) {
        let (entered_tx, entered_rx) = channel();
        let (release_tx, release_rx) = channel();
        let sleeper = Arc::new(GatedSleeper {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        (sleeper, entered_rx, release_tx)
    }
}

impl Sleeper for GatedSleeper {
    fn sleep(&self, _duration: Duration) {
        let release = self.release.lock().unwrap();
        let _ = self.entered.lock().unwrap().send(());
        let _ = release.recv();
    }
}
