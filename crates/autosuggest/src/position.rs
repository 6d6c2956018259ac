//! Overlay placement below the bound input.

use autosuggest_core::logging::targets;
use autosuggest_core::{Document, NodeId, Rect, Viewport};

/// Computed overlay box, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Top edge, at the input's bottom edge.
    pub top: f32,
    /// Left edge, aligned with the input.
    pub left: f32,
    /// Width, equal to the input's rendered width.
    pub width: f32,
    /// Room between the input's bottom edge and the bottom of the viewport.
    pub max_height: f32,
}

impl Placement {
    /// Place the overlay flush under an input.
    ///
    /// `input_rect` is the input's bounding rectangle in viewport
    /// coordinates; `input_width` and `input_height` are its rendered
    /// (offset) size.
    pub fn below(input_rect: Rect, input_width: f32, input_height: f32, viewport: &Viewport) -> Self {
        let anchor = viewport.to_document(input_rect);
        Self {
            top: anchor.top() + input_height,
            left: anchor.left(),
            width: input_width,
            max_height: (viewport.inner_height - (input_rect.top() + input_height)).max(0.0),
        }
    }

    /// Write this placement to the overlay's inline style.
    pub fn apply(&self, document: &dyn Document, overlay: NodeId) {
        document.set_style(overlay, "width", &px(self.width));
        document.set_style(overlay, "top", &px(self.top));
        document.set_style(overlay, "left", &px(self.left));
        document.set_style(overlay, "max-height", &px(self.max_height));
    }
}

fn px(value: f32) -> String {
    format!("{value}px")
}

/// Arguments handed to a `customize` hook after the overlay is placed.
#[derive(Debug, Clone, Copy)]
pub struct CustomizeContext {
    /// The bound input.
    pub input: NodeId,
    /// The input's bounding rectangle at placement time.
    pub input_rect: Rect,
    /// The overlay container.
    pub overlay: NodeId,
    /// The max height that was applied.
    pub max_height: f32,
}

/// Measure `input` and place `overlay` under it.
pub(crate) fn place(document: &dyn Document, input: NodeId, overlay: NodeId) -> CustomizeContext {
    let input_rect = document.bounding_client_rect(input);
    let placement = Placement::below(
        input_rect,
        document.offset_width(input),
        document.offset_height(input),
        &document.viewport(),
    );
    placement.apply(document, overlay);

    tracing::trace!(
        target: targets::POSITION,
        top = placement.top,
        left = placement.left,
        width = placement.width,
        max_height = placement.max_height,
        "placed overlay"
    );

    CustomizeContext {
        input,
        input_rect,
        overlay,
        max_height: placement.max_height,
    }
}
