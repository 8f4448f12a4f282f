use super::backend::Extent;

/// Local work-group edge fixed by the kernel's `@workgroup_size(8, 8, 1)`.
pub const WORKGROUP_SIZE: u32 = 8;

/// Work-group counts for one dispatch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WorkGroups {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl WorkGroups {
    /// Smallest grid of 8x8 groups covering every pixel of `extent`.
    ///
    /// Rounds up: a 500-pixel-wide target gets 63 columns, the last one
    /// partially outside the image (the kernel bounds-checks).
    #[inline]
    pub const fn covering(extent: Extent) -> Self {
        Self {
            x: extent.width.div_ceil(WORKGROUP_SIZE),
            y: extent.height.div_ceil(WORKGROUP_SIZE),
            z: 1,
        }
    }

    /// Invocations along x and y.
    #[inline]
    pub const fn invocations(self) -> (u64, u64) {
        (
            self.x as u64 * WORKGROUP_SIZE as u64,
            self.y as u64 * WORKGROUP_SIZE as u64,
        )
    }

    /// Whether every pixel of `extent` receives an invocation.
    #[inline]
    pub const fn covers(self, extent: Extent) -> bool {
        let (w, h) = self.invocations();
        self.z >= 1 && w >= extent.width as u64 && h >= extent.height as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiples() {
        let g = WorkGroups::covering(Extent::new(1024, 768));
        assert_eq!((g.x, g.y, g.z), (128, 96, 1));
        assert!(g.covers(Extent::new(1024, 768)));
    }

    #[test]
    fn rounds_up_partial_groups() {
        let g = WorkGroups::covering(Extent::new(500, 333));
        assert_eq!((g.x, g.y), (63, 42));
        // Pixels 496..500 fall into the 63rd column.
        assert!(g.invocations().0 >= 500);
        assert!(g.covers(Extent::new(500, 333)));
    }

    #[test]
    fn truncation_would_miss_the_border() {
        let truncated = WorkGroups { x: 500 / WORKGROUP_SIZE, y: 1, z: 1 };
        assert!(!truncated.covers(Extent::new(500, 8)));
    }

    #[test]
    fn tiny_targets_get_one_group() {
        let g = WorkGroups::covering(Extent::new(1, 1));
        assert_eq!((g.x, g.y, g.z), (1, 1, 1));
    }
}
