//! Persistent worker pool that renders one frame at a time, row by row.
//!
//! A frame is a two-phase handshake. The driver publishes the frame target,
//! resets the shared row counter and posts one entry permit per worker.
//! Workers claim rows with `fetch_add` until the counter passes the surface
//! height, then each posts one exit permit. The driver returns once it has
//! collected all exit permits, so every row in `[0, height)` is rendered by
//! exactly one worker and no worker touches the surface afterwards.
//!
//! Entry permits are not tied to workers: a fast worker may take a second
//! permit in the same frame and find no rows left. Per-worker row counts
//! therefore accumulate over the frame instead of being overwritten per pass.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, error, trace};
use thiserror::Error;

use super::semaphore::Semaphore;
use super::surface::{Surface, SurfaceDescriptor};
use crate::camera::Camera;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("a frame scheduler needs at least one worker")]
    NoWorkers,

    #[error("failed to spawn render worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("rendering row {row} panicked: {message}")]
    RowPanicked { row: usize, message: String },
}

/// Everything a worker needs to know about the frame being rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub descriptor: SurfaceDescriptor,
    pub camera: Camera,
}

/// Shades single rows of a frame. Called concurrently from every worker.
pub trait RowRenderer: Send + Sync + 'static {
    /// Fills `row`, the `descriptor.row_bytes()` pixel bytes of row `y`.
    fn render_row(&self, frame: &FrameParams, y: usize, row: &mut [u8]);
}

/// Rows rendered by each worker during one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameReport {
    pub rows_per_worker: Vec<usize>,
}

impl FrameReport {
    pub fn total_rows(&self) -> usize {
        self.rows_per_worker.iter().sum()
    }
}

/// Raw surface pointer handed to workers for the duration of one frame.
#[derive(Clone, Copy)]
struct FrameTarget {
    pixels: *mut u8,
    params: FrameParams,
}

// Safety: the pointer is only dereferenced between the entry and exit
// handshake of a frame, while the driver holds the surface mutably borrowed.
unsafe impl Send for FrameTarget {}

impl FrameTarget {
    /// # Safety
    /// `y` must be below the surface height and claimed by exactly one
    /// worker in the current frame.
    unsafe fn row_mut<'a>(&self, y: usize) -> &'a mut [u8] {
        let descriptor = &self.params.descriptor;
        std::slice::from_raw_parts_mut(self.pixels.add(y * descriptor.stride), descriptor.row_bytes())
    }
}

struct Shared<R> {
    renderer: R,
    target: Mutex<Option<FrameTarget>>,
    next_row: AtomicUsize,
    exiting: AtomicBool,
    entry: Semaphore,
    exit: Semaphore,
    rows_rendered: Vec<AtomicUsize>,
    /// First row that panicked in the current frame.
    failure: Mutex<Option<(usize, String)>>,
}

/// Fixed pool of render workers kept alive across frames.
pub struct FrameScheduler<R: RowRenderer> {
    shared: Arc<Shared<R>>,
    workers: Vec<JoinHandle<()>>,
}

impl<R: RowRenderer> FrameScheduler<R> {
    /// Spawns `worker_count` threads, all parked until the first frame.
    pub fn new(renderer: R, worker_count: usize) -> Result<Self, SchedulerError> {
        if worker_count == 0 {
            return Err(SchedulerError::NoWorkers);
        }

        let shared = Arc::new(Shared {
            renderer,
            target: Mutex::new(None),
            next_row: AtomicUsize::new(0),
            exiting: AtomicBool::new(false),
            entry: Semaphore::new(0),
            exit: Semaphore::new(0),
            rows_rendered: (0..worker_count).map(|_| AtomicUsize::new(0)).collect(),
            failure: Mutex::new(None),
        });

        let mut scheduler = Self {
            shared,
            workers: Vec::with_capacity(worker_count),
        };

        for index in 0..worker_count {
            let shared = Arc::clone(&scheduler.shared);
            // On failure, dropping `scheduler` stops the workers spawned so far
            let handle = thread::Builder::new()
                .name(format!("sdf-render-{index}"))
                .spawn(move || worker_loop(&shared, index))?;
            scheduler.workers.push(handle);
        }

        debug!("Frame scheduler started with {worker_count} workers");
        Ok(scheduler)
    }

    pub fn worker_count(&self) -> usize {
        self.shared.rows_rendered.len()
    }

    pub fn renderer(&self) -> &R {
        &self.shared.renderer
    }

    /// Renders one complete frame of `surface` as seen from `camera`.
    ///
    /// Blocks until every row has been claimed. The camera is copied into the
    /// frame, so the caller may move its own camera as soon as this returns.
    /// A panic inside the row renderer is caught on the worker; the frame
    /// still completes and the first such panic is returned as an error.
    pub fn render_frame(
        &mut self,
        surface: &mut Surface,
        camera: Camera,
    ) -> Result<FrameReport, SchedulerError> {
        let shared = &*self.shared;
        let params = FrameParams {
            descriptor: surface.descriptor(),
            camera,
        };

        *shared.target.lock().unwrap_or_else(PoisonError::into_inner) = Some(FrameTarget {
            pixels: surface.pixels_mut().as_mut_ptr(),
            params,
        });
        shared.next_row.store(0, Ordering::Relaxed);
        for rows in &shared.rows_rendered {
            rows.store(0, Ordering::Relaxed);
        }

        let workers = self.worker_count();
        shared.entry.post_many(workers);
        for _ in 0..workers {
            shared.exit.wait();
        }

        *shared.target.lock().unwrap_or_else(PoisonError::into_inner) = None;

        if let Some((row, message)) = shared
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            error!("Row {row} panicked: {message}");
            return Err(SchedulerError::RowPanicked { row, message });
        }

        let report = FrameReport {
            rows_per_worker: shared
                .rows_rendered
                .iter()
                .map(|rows| rows.load(Ordering::Relaxed))
                .collect(),
        };
        trace!("Frame rows per worker: {:?}", report.rows_per_worker);
        Ok(report)
    }

    /// Stops and joins every worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        self.shared.exiting.store(true, Ordering::Release);
        self.shared.entry.post_many(self.workers.len());

        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("sdf-render").to_owned();
            if handle.join().is_err() {
                error!("Render worker {name} panicked");
            }
        }
        debug!("Frame scheduler stopped");
    }
}

impl<R: RowRenderer> Drop for FrameScheduler<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_loop<R: RowRenderer>(shared: &Shared<R>, index: usize) {
    trace!("Render worker {index} waiting for frames");

    loop {
        shared.entry.wait();
        if shared.exiting.load(Ordering::Acquire) {
            trace!("Render worker {index} exiting");
            return;
        }

        let target = *shared.target.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(target) = target {
            render_rows(shared, &target, index);
        }

        shared.exit.post();
    }
}

/// Claims and renders rows until none are left in the current frame.
fn render_rows<R: RowRenderer>(shared: &Shared<R>, target: &FrameTarget, index: usize) {
    let height = target.params.descriptor.height;
    loop {
        let y = shared.next_row.fetch_add(1, Ordering::Relaxed);
        if y >= height {
            return;
        }

        // Safety: `fetch_add` hands out each row index exactly once per frame
        let row = unsafe { target.row_mut(y) };
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| {
            shared.renderer.render_row(&target.params, y, row)
        }));

        match rendered {
            Ok(()) => {
                shared.rows_rendered[index].fetch_add(1, Ordering::Relaxed);
            }
            Err(payload) => {
                shared
                    .failure
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .get_or_insert_with(|| (y, panic_message(payload.as_ref())));
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::PixelFormat;

    /// Writes the row index into every byte of the row.
    struct RowIndexRenderer;

    impl RowRenderer for RowIndexRenderer {
        fn render_row(&self, _frame: &FrameParams, y: usize, row: &mut [u8]) {
            row.fill(y as u8);
        }
    }

    /// Panics on a single row and fills every other one.
    struct FailingRowRenderer {
        bad_row: usize,
    }

    impl RowRenderer for FailingRowRenderer {
        fn render_row(&self, _frame: &FrameParams, y: usize, row: &mut [u8]) {
            if y == self.bad_row {
                panic!("cannot shade row {y}");
            }
            row.fill(1);
        }
    }

    #[test]
    fn test_zero_workers_is_an_error() {
        assert!(matches!(
            FrameScheduler::new(RowIndexRenderer, 0),
            Err(SchedulerError::NoWorkers)
        ));
    }

    #[test]
    fn test_every_row_is_written() {
        let mut scheduler = FrameScheduler::new(RowIndexRenderer, 3).expect("scheduler");
        let mut surface = Surface::new(5, 40, PixelFormat::Rgba8888);

        let report = scheduler
            .render_frame(&mut surface, Camera::default())
            .expect("frame");

        assert_eq!(report.total_rows(), 40);
        assert_eq!(report.rows_per_worker.len(), 3);
        for y in 0..40 {
            assert!(surface.row(y).iter().all(|&b| b == y as u8), "row {y}");
        }
        scheduler.shutdown();
    }

    #[test]
    fn test_report_counts_every_row_across_many_frames() {
        let mut scheduler = FrameScheduler::new(RowIndexRenderer, 4).expect("scheduler");
        let mut surface = Surface::new(5, 40, PixelFormat::Rgba8888);

        for frame in 0..1000 {
            let report = scheduler
                .render_frame(&mut surface, Camera::default())
                .expect("frame");
            assert_eq!(
                report.total_rows(),
                40,
                "frame {frame}: {:?}",
                report.rows_per_worker
            );
        }
    }

    #[test]
    fn test_row_panic_is_reported_not_hung() {
        let mut scheduler =
            FrameScheduler::new(FailingRowRenderer { bad_row: 3 }, 2).expect("scheduler");
        let mut surface = Surface::new(4, 8, PixelFormat::Rgba8888);

        let result = scheduler.render_frame(&mut surface, Camera::default());

        match result {
            Err(SchedulerError::RowPanicked { row, message }) => {
                assert_eq!(row, 3);
                assert!(message.contains("cannot shade row 3"), "{message}");
            }
            other => panic!("expected a row panic, got {other:?}"),
        }
        for y in (0..8).filter(|&y| y != 3) {
            assert!(surface.row(y).iter().all(|&b| b == 1), "row {y}");
        }
    }

    #[test]
    fn test_workers_survive_a_row_panic() {
        let mut scheduler =
            FrameScheduler::new(FailingRowRenderer { bad_row: 100 }, 2).expect("scheduler");
        let mut tall = Surface::new(2, 101, PixelFormat::Rgba8888);
        let mut short = Surface::new(2, 10, PixelFormat::Rgba8888);

        assert!(scheduler.render_frame(&mut tall, Camera::default()).is_err());
        let report = scheduler
            .render_frame(&mut short, Camera::default())
            .expect("frame after a panic");

        assert_eq!(report.total_rows(), 10);
        scheduler.shutdown();
    }

    #[test]
    fn test_stride_padding_is_untouched() {
        let mut scheduler = FrameScheduler::new(RowIndexRenderer, 2).expect("scheduler");
        let mut surface = Surface::with_stride(2, 4, 12, PixelFormat::Rgba8888).expect("surface");
        surface.pixels_mut().fill(0xAA);

        scheduler
            .render_frame(&mut surface, Camera::default())
            .expect("frame");

        for y in 0..4 {
            let start = y * 12;
            assert!(surface.pixels()[start..start + 8].iter().all(|&b| b == y as u8));
            assert!(surface.pixels()[start + 8..start + 12].iter().all(|&b| b == 0xAA));
        }
    }

    #[test]
    fn test_zero_height_frame_completes() {
        let mut scheduler = FrameScheduler::new(RowIndexRenderer, 4).expect("scheduler");
        let mut surface = Surface::new(8, 0, PixelFormat::Rgba8888);
        let report = scheduler
            .render_frame(&mut surface, Camera::default())
            .expect("frame");
        assert_eq!(report.total_rows(), 0);
    }

    #[test]
    fn test_drop_without_frames_joins_workers() {
        let scheduler = FrameScheduler::new(RowIndexRenderer, 4).expect("scheduler");
        drop(scheduler);
    }
}
