use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a [`Surface`].
///
/// "Is this the active screen?" is answered by comparing ids against the
/// context's active-target id — never by inspecting the surface's shape.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// A pixel target handle.
///
/// The only drawable surface is the screen surface returned by
/// `RenderContext::set_mode`. Offscreen surfaces carry an identity and a size
/// but cannot be drawn to yet; draw calls against them are reported as
/// unsupported rather than corrupting the active batch.
#[derive(Debug, Clone)]
pub struct Surface {
    id: SurfaceId,
    width: u32,
    height: u32,
}

impl Surface {
    /// The screen surface created by `set_mode`.
    pub(crate) fn screen(width: u32, height: u32) -> Self {
        Self::with_fresh_id(width, height)
    }

    /// An offscreen surface. Drawing to one is not implemented; the handle
    /// exists so callers can hold sizes/identities for future blit support.
    pub fn offscreen(width: u32, height: u32) -> Self {
        Self::with_fresh_id(width, height)
    }

    fn with_fresh_id(width: u32, height: u32) -> Self {
        Self {
            id: SurfaceId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
        }
    }

    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
