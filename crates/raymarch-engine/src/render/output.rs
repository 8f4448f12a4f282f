use crate::error::{RenderError, RenderResult};

use super::backend::{Extent, KernelBackend, SurfaceHandle};

/// The float image the kernel writes into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct OutputSurface {
    pub handle: SurfaceHandle,
    pub extent: Extent,
}

/// Keeps one output image sized to the display, recreating it on resize.
#[derive(Debug, Default)]
pub struct OutputSurfaceManager {
    current: Option<OutputSurface>,
    recreations: u64,
}

impl OutputSurfaceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an output image matching `extent` and whether it was just created.
    ///
    /// A stale image is released before the replacement is allocated, so at
    /// most one is alive at a time. Zero-area extents are rejected.
    pub fn ensure_surface<B: KernelBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        extent: Extent,
    ) -> RenderResult<(OutputSurface, bool)> {
        if let Some(s) = self.current {
            if s.extent == extent {
                return Ok((s, false));
            }
        }

        if extent.is_empty() {
            return Err(RenderError::allocation(
                "output surface",
                format!("zero-area extent {}x{}", extent.width, extent.height),
            ));
        }

        self.release(backend);

        let handle = backend.create_surface(extent)?;
        let surface = OutputSurface { handle, extent };
        self.current = Some(surface);
        self.recreations += 1;

        log::debug!(
            "output surface (re)created at {}x{}",
            extent.width,
            extent.height
        );

        Ok((surface, true))
    }

    pub fn current(&self) -> Option<OutputSurface> {
        self.current
    }

    /// How many images this manager has allocated so far.
    pub fn recreations(&self) -> u64 {
        self.recreations
    }

    pub fn release<B: KernelBackend + ?Sized>(&mut self, backend: &mut B) {
        if let Some(s) = self.current.take() {
            backend.destroy_surface(s.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::recording::RecordingBackend;

    #[test]
    fn same_extent_reuses_surface() {
        let mut backend = RecordingBackend::new();
        let mut mgr = OutputSurfaceManager::new();

        let (a, created) = mgr.ensure_surface(&mut backend, Extent::new(640, 480)).unwrap();
        assert!(created);
        let (b, created) = mgr.ensure_surface(&mut backend, Extent::new(640, 480)).unwrap();
        assert!(!created);
        assert_eq!(a, b);
        assert_eq!(backend.surfaces_created(), 1);
    }

    #[test]
    fn resize_replaces_surface() {
        let mut backend = RecordingBackend::new();
        let mut mgr = OutputSurfaceManager::new();

        let (a, _) = mgr.ensure_surface(&mut backend, Extent::new(640, 480)).unwrap();
        let (b, created) = mgr.ensure_surface(&mut backend, Extent::new(800, 600)).unwrap();
        assert!(created);
        assert_ne!(a.handle, b.handle);
        assert_eq!(b.extent, Extent::new(800, 600));
        assert_eq!(backend.live_surfaces(), 1);
        assert_eq!(mgr.recreations(), 2);
    }

    #[test]
    fn zero_area_is_rejected_without_dropping_current() {
        let mut backend = RecordingBackend::new();
        let mut mgr = OutputSurfaceManager::new();
        mgr.ensure_surface(&mut backend, Extent::new(64, 64)).unwrap();

        let err = mgr.ensure_surface(&mut backend, Extent::new(0, 64)).unwrap_err();
        assert!(matches!(err, RenderError::ResourceAllocation { .. }));
        assert!(mgr.current().is_some());
        assert_eq!(backend.live_surfaces(), 1);
    }

    #[test]
    fn release_frees_surface() {
        let mut backend = RecordingBackend::new();
        let mut mgr = OutputSurfaceManager::new();
        mgr.ensure_surface(&mut backend, Extent::new(8, 8)).unwrap();
        mgr.release(&mut backend);
        mgr.release(&mut backend);
        assert!(mgr.current().is_none());
        assert_eq!(backend.live_surfaces(), 0);
    }
}
