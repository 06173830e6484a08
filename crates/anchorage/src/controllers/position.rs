//! Placement of a floating surface against an anchor.
//!
//! A placement aligns a corner of the surface with a corner of the anchor.
//! Each axis is solved on its own: compute the inset for the requested edge
//! pairing, measure how far the surface would spill past the far viewport
//! edge, and if it spills, try the mirrored pairing and keep whichever
//! spills less.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::corner::{Corner, Edge};
use crate::{
    context::Context,
    dom::{Document, ElementId, StyleMap, TextDirection},
    error::{Error, Result},
    geom::{Axis, Expanse, Rect},
};

/// How computed insets are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Positioning {
    /// Insets are relative to the anchor's containing block and scroll with
    /// the page.
    #[default]
    Absolute,
    /// Insets are relative to the viewport.
    Fixed,
    /// Like `Fixed`, with the page scroll offset layered in.
    Document,
    /// Promote the surface to the top layer and position it like `Document`.
    /// Degrades to `Fixed` when the platform has no popovers.
    Popover,
}

impl Positioning {
    /// The keyword form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
            Self::Document => "document",
            Self::Popover => "popover",
        }
    }

    /// Are insets measured from the viewport edges?
    fn relative_to_window(self) -> bool {
        matches!(self, Self::Fixed | Self::Document)
    }
}

impl FromStr for Positioning {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "fixed" => Ok(Self::Fixed),
            "document" => Ok(Self::Document),
            "popover" => Ok(Self::Popover),
            _ => Err(Error::Invalid(format!("unknown positioning: {s:?}"))),
        }
    }
}

impl fmt::Display for Positioning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with the remaining overflow once a placement is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositionStrategy {
    /// Keep the surface's size and shift it back inside the viewport.
    Move,
    /// Keep the alignment and shrink the surface by the overflow.
    #[default]
    Resize,
}

/// Everything the controller needs to place a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionProperties {
    /// The anchor element.
    pub anchor: Option<ElementId>,
    /// The surface element.
    pub surface: Option<ElementId>,
    /// Corner of the anchor to align to.
    pub anchor_corner: Corner,
    /// Corner of the surface to align.
    pub surface_corner: Corner,
    /// Positioning mode.
    pub positioning: Positioning,
    /// Is the owning widget open?
    pub is_open: bool,
    /// Extra inline-axis offset in pixels.
    pub x_offset: f64,
    /// Extra block-axis offset in pixels.
    pub y_offset: f64,
    /// Never flip the block axis.
    pub disable_block_flip: bool,
    /// Never flip the inline axis.
    pub disable_inline_flip: bool,
    /// Overflow handling.
    pub reposition_strategy: RepositionStrategy,
}

impl Default for PositionProperties {
    fn default() -> Self {
        Self {
            anchor: None,
            surface: None,
            anchor_corner: Corner::END_START,
            surface_corner: Corner::START_START,
            positioning: Positioning::Absolute,
            is_open: false,
            x_offset: 0.0,
            y_offset: 0.0,
            disable_block_flip: false,
            disable_inline_flip: false,
            reposition_strategy: RepositionStrategy::Resize,
        }
    }
}

/// Block-axis inset properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockInset {
    /// `inset-block-start`
    Start,
    /// `inset-block-end`
    End,
}

impl BlockInset {
    /// The CSS property name.
    pub fn property(self) -> &'static str {
        match self {
            Self::Start => "inset-block-start",
            Self::End => "inset-block-end",
        }
    }
}

/// Inline-axis inset properties. Viewport-relative modes use physical sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineInset {
    /// `inset-inline-start`
    Start,
    /// `inset-inline-end`
    End,
    /// `left`
    Left,
    /// `right`
    Right,
}

impl InlineInset {
    /// The CSS property name.
    pub fn property(self) -> &'static str {
        match self {
            Self::Start => "inset-inline-start",
            Self::End => "inset-inline-end",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Surface visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceDisplay {
    /// Laid out.
    Block,
    /// Not laid out; measures as a zero rect.
    None,
}

/// The computed style record for the surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceStyles {
    /// `display`
    pub display: Option<SurfaceDisplay>,
    /// `opacity`
    pub opacity: Option<f64>,
    /// The block-axis inset.
    pub block: Option<(BlockInset, f64)>,
    /// The inline-axis inset.
    pub inline: Option<(InlineInset, f64)>,
    /// `height`, when resizing to fit.
    pub height: Option<f64>,
    /// `width`, when resizing to fit.
    pub width: Option<f64>,
}

impl SurfaceStyles {
    /// Hidden.
    pub fn hidden() -> Self {
        Self {
            display: Some(SurfaceDisplay::None),
            ..Self::default()
        }
    }

    /// Laid out but invisible, so that it can be measured.
    pub fn measuring() -> Self {
        Self {
            display: Some(SurfaceDisplay::Block),
            opacity: Some(0.0),
            ..Self::default()
        }
    }

    /// Render as an inline style record.
    pub fn to_style_map(&self) -> StyleMap {
        let mut s = StyleMap::new();
        match self.display {
            Some(SurfaceDisplay::Block) => s.set("display", "block"),
            Some(SurfaceDisplay::None) => s.set("display", "none"),
            None => {}
        }
        if let Some(o) = self.opacity {
            s.set("opacity", o.to_string());
        }
        if let Some((p, v)) = self.block {
            s.set(p.property(), px(v));
        }
        if let Some((p, v)) = self.inline {
            s.set(p.property(), px(v));
        }
        if let Some(h) = self.height {
            s.set("height", px(h));
        }
        if let Some(w) = self.width {
            s.set("width", px(w));
        }
        s
    }
}

/// Format a pixel length.
fn px(v: f64) -> String {
    format!("{v}px")
}

/// Measurements for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisMetrics {
    /// Anchor's near coordinate (top, or left).
    anchor_near: f64,
    /// Anchor's far coordinate (bottom, or right).
    anchor_far: f64,
    /// Surface size along the axis.
    surface_size: f64,
    /// Usable viewport extent along the axis.
    viewport: f64,
    /// Page scroll along the axis.
    scroll: f64,
    /// Is the axis reversed (inline axis in right-to-left)?
    reversed: bool,
}

impl AxisMetrics {
    /// Pull one axis out of a full set of measurements.
    fn measure(axis: Axis, m: &Measurements) -> Self {
        match axis {
            Axis::Block => Self {
                anchor_near: m.anchor.top(),
                anchor_far: m.anchor.bottom(),
                surface_size: m.surface.h,
                viewport: m.viewport.h,
                scroll: m.scroll_y,
                reversed: false,
            },
            Axis::Inline => Self {
                anchor_near: m.anchor.left(),
                anchor_far: m.anchor.right(),
                surface_size: m.surface.w,
                viewport: m.viewport.w,
                scroll: m.scroll_x,
                reversed: m.direction == TextDirection::Rtl,
            },
        }
    }
}

/// The result of solving one axis for one edge pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPlacement {
    /// The surface edge the inset is measured from.
    pub surface_edge: Edge,
    /// The inset value in pixels.
    pub inset: f64,
    /// How far the surface spills past the far viewport edge. Never negative.
    pub correction: f64,
    /// Was the mirrored pairing chosen?
    pub flipped: bool,
}

/// Solve one axis for an explicit edge pairing.
fn solve_axis(
    m: &AxisMetrics,
    anchor_edge: Edge,
    surface_edge: Edge,
    offset: f64,
    positioning: Positioning,
) -> AxisPlacement {
    let anchor_size = m.anchor_far - m.anchor_near;
    let anchor_offset = if anchor_edge == surface_edge {
        0.0
    } else {
        anchor_size
    } + offset;

    // Distance from the viewport edge the surface's edge is measured from to
    // the corresponding anchor edge.
    let from_near = m.anchor_near;
    let from_far = m.viewport - m.anchor_far;
    let (start_dist, end_dist) = if m.reversed {
        (from_far, from_near)
    } else {
        (from_near, from_far)
    };
    let top_layer = match surface_edge {
        Edge::Start => start_dist,
        Edge::End => end_dist,
    };

    let start_scroll = if m.reversed { -m.scroll } else { m.scroll };
    let document_offset = match surface_edge {
        Edge::Start => start_scroll,
        Edge::End => -start_scroll,
    };

    let correction = (m.viewport - top_layer - anchor_offset - m.surface_size)
        .min(0.0)
        .abs();

    let mut inset = anchor_offset;
    if positioning.relative_to_window() {
        inset += top_layer;
    }
    if positioning == Positioning::Document {
        inset += document_offset;
    }
    AxisPlacement {
        surface_edge,
        inset,
        correction,
        flipped: false,
    }
}

/// Solve one axis, flipping to the mirrored pairing when that spills less.
fn solve_axis_with_flip(
    m: &AxisMetrics,
    anchor_edge: Edge,
    surface_edge: Edge,
    offset: f64,
    positioning: Positioning,
    allow_flip: bool,
) -> AxisPlacement {
    let placed = solve_axis(m, anchor_edge, surface_edge, offset, positioning);
    if placed.correction == 0.0 || !allow_flip {
        return placed;
    }
    let flipped = solve_axis(m, anchor_edge.flip(), surface_edge.flip(), offset, positioning);
    if placed.correction > flipped.correction {
        AxisPlacement {
            flipped: true,
            ..flipped
        }
    } else {
        placed
    }
}

/// Geometry inputs to a placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    /// Anchor rect in viewport coordinates.
    pub anchor: Rect,
    /// Surface size.
    pub surface: Expanse,
    /// Usable viewport size.
    pub viewport: Expanse,
    /// Page scroll x.
    pub scroll_x: f64,
    /// Page scroll y.
    pub scroll_y: f64,
    /// Writing direction of the surface.
    pub direction: TextDirection,
}

/// A solved placement for both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Block axis.
    pub block: AxisPlacement,
    /// Inline axis.
    pub inline: AxisPlacement,
    /// Positioning mode the placement was computed for, after degradation.
    pub positioning: Positioning,
    /// Writing direction used for the inline axis.
    pub direction: TextDirection,
    /// Overflow handling.
    pub strategy: RepositionStrategy,
    /// The measured surface size.
    pub surface: Expanse,
}

impl Placement {
    /// The style record that realizes this placement.
    pub fn styles(&self) -> SurfaceStyles {
        let mut block_inset = self.block.inset;
        let mut inline_inset = self.inline.inset;
        if self.strategy == RepositionStrategy::Move {
            block_inset -= self.block.correction;
            inline_inset -= self.inline.correction;
        }

        let block_prop = match self.block.surface_edge {
            Edge::Start => BlockInset::Start,
            Edge::End => BlockInset::End,
        };
        let inline_prop = if self.positioning.relative_to_window() {
            let ltr = self.direction == TextDirection::Ltr;
            match (self.inline.surface_edge, ltr) {
                (Edge::Start, true) | (Edge::End, false) => InlineInset::Left,
                _ => InlineInset::Right,
            }
        } else {
            match self.inline.surface_edge {
                Edge::Start => InlineInset::Start,
                Edge::End => InlineInset::End,
            }
        };

        let mut styles = SurfaceStyles {
            display: Some(SurfaceDisplay::Block),
            opacity: Some(1.0),
            block: Some((block_prop, block_inset)),
            inline: Some((inline_prop, inline_inset)),
            height: None,
            width: None,
        };
        if self.strategy == RepositionStrategy::Resize {
            if self.block.correction > 0.0 {
                styles.height = Some(self.surface.h - self.block.correction);
            }
            if self.inline.correction > 0.0 {
                styles.width = Some(self.surface.w - self.inline.correction);
            }
        }
        styles
    }
}

/// Solve a placement from measurements. `positioning` must already be
/// resolved: `Popover` is treated like `Document`.
pub fn solve(props: &PositionProperties, m: &Measurements) -> Placement {
    let positioning = match props.positioning {
        Positioning::Popover => Positioning::Document,
        p => p,
    };
    let block = AxisMetrics::measure(Axis::Block, m);
    let inline = AxisMetrics::measure(Axis::Inline, m);
    Placement {
        block: solve_axis_with_flip(
            &block,
            props.anchor_corner.block,
            props.surface_corner.block,
            props.y_offset,
            positioning,
            !props.disable_block_flip,
        ),
        inline: solve_axis_with_flip(
            &inline,
            props.anchor_corner.inline,
            props.surface_corner.inline,
            props.x_offset,
            positioning,
            !props.disable_inline_flip,
        ),
        positioning,
        direction: m.direction,
        strategy: props.reposition_strategy,
        surface: m.surface,
    }
}

/// What a host update did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionChange {
    /// Nothing.
    Unchanged,
    /// The surface was positioned.
    Positioned,
    /// The surface was hidden.
    Closed,
}

/// Computes and applies the surface's position. Owned by the host widget.
#[derive(Debug, Default)]
pub struct SurfacePositionController {
    /// The most recently applied styles.
    styles: SurfaceStyles,
    /// The most recent placement.
    placement: Option<Placement>,
    /// Properties seen at the last host update.
    last: Option<PositionProperties>,
}

impl SurfacePositionController {
    /// A controller that has not positioned anything yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The styles currently bound to the surface.
    pub fn surface_styles(&self) -> &SurfaceStyles {
        &self.styles
    }

    /// The most recent placement.
    pub fn placement(&self) -> Option<&Placement> {
        self.placement.as_ref()
    }

    /// Bind a style record to the surface and ask for a re-render.
    fn apply<C: Context>(&mut self, ctx: &mut C, surface: ElementId, styles: SurfaceStyles) -> Result<()> {
        ctx.doc_mut()
            .bind_style(surface, "style", styles.to_style_map())?;
        self.styles = styles;
        ctx.request_update();
        Ok(())
    }

    /// Resolve the positioning mode against platform support.
    fn effective_positioning(doc: &Document, positioning: Positioning) -> Positioning {
        if positioning == Positioning::Popover && !doc.popover_supported() {
            debug!("popover positioning unsupported, falling back to fixed");
            return Positioning::Fixed;
        }
        positioning
    }

    /// Position the surface against the anchor. A no-op when either is
    /// missing. Completes only after the host has rendered the surface in
    /// its measurable state.
    pub async fn position<C: Context>(&mut self, ctx: &mut C, props: &PositionProperties) -> Result<()> {
        let (Some(anchor), Some(surface)) = (props.anchor, props.surface) else {
            return Ok(());
        };
        if !ctx.doc().exists(anchor) || !ctx.doc().exists(surface) {
            return Ok(());
        }

        let usable = ctx.doc().usable_viewport();
        let positioning = Self::effective_positioning(ctx.doc(), props.positioning);

        self.apply(ctx, surface, SurfaceStyles::measuring())?;
        ctx.update_complete().await;

        if positioning == Positioning::Popover && ctx.doc().is_connected(surface) {
            if let Err(e) = ctx.doc_mut().show_popover(surface) {
                warn!("could not show popover: {e}");
            }
        }

        let doc = ctx.doc();
        let vp = doc.viewport();
        let m = Measurements {
            anchor: doc.surface_position_rect(anchor),
            surface: doc.surface_position_rect(surface).expanse(),
            viewport: usable.expanse(),
            scroll_x: vp.scroll_x,
            scroll_y: vp.scroll_y,
            direction: doc.computed_direction(surface),
        };
        let placement = solve(
            &PositionProperties {
                positioning,
                ..props.clone()
            },
            &m,
        );
        debug!(
            block = ?placement.block,
            inline = ?placement.inline,
            positioning = %placement.positioning,
            "positioned surface"
        );
        let styles = placement.styles();
        self.placement = Some(placement);
        self.apply(ctx, surface, styles)
    }

    /// Hide the surface and take it out of the top layer.
    pub fn close<C: Context>(&mut self, ctx: &mut C, props: &PositionProperties) -> Result<()> {
        let Some(surface) = props.surface else {
            return Ok(());
        };
        if !ctx.doc().exists(surface) {
            return Ok(());
        }
        if ctx.doc().is_popover_open(surface) {
            ctx.doc_mut().hide_popover(surface)?;
        }
        self.apply(ctx, surface, SurfaceStyles::hidden())
    }

    /// React to a host update: position when opening or when placement
    /// inputs changed while open, hide when closing.
    pub async fn host_updated<C: Context>(
        &mut self,
        ctx: &mut C,
        props: &PositionProperties,
    ) -> Result<PositionChange> {
        let prev = self.last.replace(props.clone());
        let was_open = prev.as_ref().is_some_and(|p| p.is_open);
        if props.is_open {
            if !was_open || prev.as_ref() != Some(props) {
                self.position(ctx, props).await?;
                return Ok(PositionChange::Positioned);
            }
        } else if was_open || prev.is_none() {
            self.close(ctx, props)?;
            return Ok(PositionChange::Closed);
        }
        Ok(PositionChange::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn measurements(anchor: Rect, surface: Expanse, viewport: Expanse) -> Measurements {
        Measurements {
            anchor,
            surface,
            viewport,
            scroll_x: 0.0,
            scroll_y: 0.0,
            direction: TextDirection::Ltr,
        }
    }

    fn fixed(anchor_corner: Corner, surface_corner: Corner) -> PositionProperties {
        PositionProperties {
            anchor_corner,
            surface_corner,
            positioning: Positioning::Fixed,
            ..PositionProperties::default()
        }
    }

    #[test]
    fn opens_downward_when_there_is_room() {
        let m = measurements(
            Rect::new(100.0, 100.0, 80.0, 30.0),
            Expanse::new(80.0, 200.0),
            Expanse::new(800.0, 600.0),
        );
        let p = solve(&fixed(Corner::END_START, Corner::START_START), &m);
        assert_eq!(p.block.inset, 130.0);
        assert_eq!(p.block.correction, 0.0);
        assert!(!p.block.flipped);
        assert_eq!(
            p.styles().to_style_map().to_string(),
            "display: block; inset-block-start: 130px; left: 100px; opacity: 1;"
        );
    }

    #[test]
    fn flips_upward_near_the_bottom() {
        let m = measurements(
            Rect::new(100.0, 500.0, 80.0, 30.0),
            Expanse::new(80.0, 400.0),
            Expanse::new(800.0, 600.0),
        );
        let p = solve(&fixed(Corner::END_START, Corner::START_START), &m);
        assert!(p.block.flipped);
        assert_eq!(p.block.surface_edge, Edge::End);
        assert_eq!(p.block.inset, 100.0);
        assert_eq!(p.block.correction, 0.0);
        let styles = p.styles();
        assert_eq!(styles.block, Some((BlockInset::End, 100.0)));
        assert_eq!(styles.height, None);
    }

    #[test]
    fn flip_can_be_disabled() {
        let m = measurements(
            Rect::new(100.0, 500.0, 80.0, 30.0),
            Expanse::new(80.0, 400.0),
            Expanse::new(800.0, 600.0),
        );
        let props = PositionProperties {
            disable_block_flip: true,
            ..fixed(Corner::END_START, Corner::START_START)
        };
        let p = solve(&props, &m);
        assert!(!p.block.flipped);
        assert_eq!(p.block.correction, 330.0);
        assert_eq!(p.styles().height, Some(70.0));

        let moved = solve(
            &PositionProperties {
                reposition_strategy: RepositionStrategy::Move,
                ..props
            },
            &m,
        );
        assert_eq!(moved.styles().block, Some((BlockInset::Start, 200.0)));
        assert_eq!(moved.styles().height, None);
    }

    #[test]
    fn keeps_original_when_flip_is_worse() {
        // Anchor in the upper part: opening down spills 50px, opening up
        // would spill 400px.
        let m = measurements(
            Rect::new(0.0, 100.0, 80.0, 50.0),
            Expanse::new(80.0, 500.0),
            Expanse::new(800.0, 600.0),
        );
        let p = solve(&fixed(Corner::END_START, Corner::START_START), &m);
        assert!(!p.block.flipped);
        assert_eq!(p.block.correction, 50.0);
        assert_eq!(p.styles().height, Some(450.0));
    }

    #[test]
    fn absolute_insets_are_anchor_relative() {
        let m = measurements(
            Rect::new(100.0, 500.0, 80.0, 30.0),
            Expanse::new(80.0, 400.0),
            Expanse::new(800.0, 600.0),
        );
        let p = solve(
            &PositionProperties {
                positioning: Positioning::Absolute,
                ..PositionProperties::default()
            },
            &m,
        );
        let styles = p.styles();
        assert_eq!(styles.block, Some((BlockInset::End, 30.0)));
        assert_eq!(styles.inline, Some((InlineInset::Start, 0.0)));
    }

    #[test]
    fn document_mode_adds_scroll() {
        let mut m = measurements(
            Rect::new(100.0, 100.0, 80.0, 30.0),
            Expanse::new(80.0, 200.0),
            Expanse::new(800.0, 600.0),
        );
        m.scroll_x = 7.0;
        m.scroll_y = 40.0;
        let props = PositionProperties {
            positioning: Positioning::Document,
            ..PositionProperties::default()
        };
        let styles = solve(&props, &m).styles();
        assert_eq!(styles.block, Some((BlockInset::Start, 170.0)));
        assert_eq!(styles.inline, Some((InlineInset::Left, 107.0)));

        let up = PositionProperties {
            anchor_corner: Corner::START_START,
            surface_corner: Corner::END_START,
            disable_block_flip: true,
            ..props
        };
        // inset-block-end = 600 - 130 + 30 - 40
        assert_eq!(solve(&up, &m).styles().block, Some((BlockInset::End, 460.0)));
    }

    #[test]
    fn rtl_mirrors_the_inline_axis() {
        let mut m = measurements(
            Rect::new(600.0, 100.0, 80.0, 30.0),
            Expanse::new(150.0, 200.0),
            Expanse::new(800.0, 600.0),
        );
        m.direction = TextDirection::Rtl;
        let styles = solve(&fixed(Corner::END_START, Corner::START_START), &m).styles();
        // Inline start is the right edge: 800 - 680.
        assert_eq!(styles.inline, Some((InlineInset::Right, 120.0)));
    }

    #[test]
    fn styles_render() {
        assert_eq!(
            SurfaceStyles::hidden().to_style_map().to_string(),
            "display: none;"
        );
        assert_eq!(
            SurfaceStyles::measuring().to_style_map().to_string(),
            "display: block; opacity: 0;"
        );
        assert_eq!("Popover".parse::<Positioning>().unwrap(), Positioning::Popover);
        assert!("sticky".parse::<Positioning>().is_err());
    }

    /// Where the surface's corner ends up on a given axis, in viewport
    /// coordinates, for a fixed placement.
    fn surface_corner_coord(inset: f64, from_end: bool, edge: Edge, size: f64, viewport: f64) -> f64 {
        let near = if from_end { viewport - inset - size } else { inset };
        match edge {
            Edge::Start => near,
            Edge::End => near + size,
        }
    }

    proptest::proptest! {
        #[test]
        fn corners_coincide_without_overflow(
            x in 4000.0..5000.0f64,
            y in 4000.0..5000.0f64,
            aw in 1.0..300.0f64,
            ah in 1.0..300.0f64,
            sw in 1.0..500.0f64,
            sh in 1.0..500.0f64,
        ) {
            let m = measurements(
                Rect::new(x, y, aw, ah),
                Expanse::new(sw, sh),
                Expanse::new(10000.0, 10000.0),
            );
            for anchor_corner in Corner::ALL {
                for surface_corner in Corner::ALL {
                    let p = solve(&fixed(anchor_corner, surface_corner), &m);
                    proptest::prop_assert!(!p.block.flipped && !p.inline.flipped);
                    let styles = p.styles();
                    let (bprop, binset) = styles.block.unwrap();
                    let (iprop, iinset) = styles.inline.unwrap();

                    let top = surface_corner_coord(
                        binset, bprop == BlockInset::End, surface_corner.block, sh, 10000.0,
                    );
                    let want_top = match anchor_corner.block {
                        Edge::Start => y,
                        Edge::End => y + ah,
                    };
                    proptest::prop_assert!((top - want_top).abs() < 1e-6);

                    let left = surface_corner_coord(
                        iinset, iprop == InlineInset::Right, surface_corner.inline, sw, 10000.0,
                    );
                    let want_left = match anchor_corner.inline {
                        Edge::Start => x,
                        Edge::End => x + aw,
                    };
                    proptest::prop_assert!((left - want_left).abs() < 1e-6);
                }
            }
        }

        #[test]
        fn flipping_never_increases_overflow(
            x in 0.0..780.0f64,
            y in 0.0..580.0f64,
            aw in 1.0..200.0f64,
            ah in 1.0..200.0f64,
            sw in 1.0..900.0f64,
            sh in 1.0..700.0f64,
            ac in 0..4usize,
            sc in 0..4usize,
        ) {
            let m = measurements(
                Rect::new(x, y, aw, ah),
                Expanse::new(sw, sh),
                Expanse::new(800.0, 600.0),
            );
            let props = fixed(Corner::ALL[ac], Corner::ALL[sc]);
            let pinned = solve(
                &PositionProperties {
                    disable_block_flip: true,
                    disable_inline_flip: true,
                    ..props.clone()
                },
                &m,
            );
            let p = solve(&props, &m);
            proptest::prop_assert!(p.block.correction <= pinned.block.correction);
            proptest::prop_assert!(p.inline.correction <= pinned.inline.correction);
            if p.block.flipped {
                proptest::prop_assert!(p.block.correction < pinned.block.correction);
            }
            if p.inline.flipped {
                proptest::prop_assert!(p.inline.correction < pinned.inline.correction);
            }
        }
    }
}
