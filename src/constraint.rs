//! Keeps label elements inside the padded printable area and away from each other
//! while they are dragged or resized.
//!
//! Resolution is greedy and never iterates: the moved element is clamped into the
//! padded interior, tested against the last known boxes of its siblings, and if it
//! collides it tries five fixed candidate spots in order before giving up and
//! keeping the clamped position. Each call is O(siblings).

use crate::template::*;
use tracing::debug;

/// An axis-aligned box, in template units, with y growing downwards
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Strict overlap test: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Bounds) -> bool {
        !(self.right <= other.left
            || self.left >= other.right
            || self.bottom <= other.top
            || self.top >= other.bottom)
    }

    /// Grow the box outwards by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Bounds {
        Bounds {
            left: self.left - amount,
            top: self.top - amount,
            right: self.right + amount,
            bottom: self.bottom + amount,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// See [Bounds::overlaps]
pub fn elements_overlap(a: &Bounds, b: &Bounds) -> bool {
    a.overlaps(b)
}

fn usable_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}

/// The box an element occupies, in template units. The element's size is given in
/// rendering pixels and is divided by `scale` (pixels per template unit).
pub fn effective_bounding_box(element: &ElementPlacement, scale: f32) -> Bounds {
    let scale = usable_scale(scale);
    let position = element.position.sanitized();
    Bounds {
        left: position.x,
        top: position.y,
        right: position.x + element.box_width() / scale,
        bottom: position.y + element.box_height() / scale,
    }
}

/// The fixed fallback spots tried when the requested position collides
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Candidate {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Candidate {
    /// Priority order in which candidates are probed
    pub const ORDER: [Candidate; 5] = [
        Candidate::TopLeft,
        Candidate::TopRight,
        Candidate::BottomLeft,
        Candidate::BottomRight,
        Candidate::Center,
    ];
}

/// The range of top-left positions that keep an element inside the padded label
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interior {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    /// The element is larger than the space available on at least one axis. The
    /// upper bound on that axis has been pulled back to the padding, so the element
    /// sits at the padding and visibly overflows the far edge.
    pub overflowing: bool,
}

impl Interior {
    pub fn for_element(element: &ElementPlacement, template: &LabelTemplate) -> Interior {
        let t = template.sanitized();
        let scale = t.scale_factor();
        let max_x = t.width - t.padding - element.box_width() / scale;
        let max_y = t.height - t.padding - element.box_height() / scale;

        Interior {
            min_x: t.padding,
            max_x: max_x.max(t.padding),
            min_y: t.padding,
            max_y: max_y.max(t.padding),
            overflowing: max_x < t.padding || max_y < t.padding,
        }
    }

    pub fn clamp(&self, position: Position) -> Position {
        let position = position.sanitized();
        Position {
            x: position.x.clamp(self.min_x, self.max_x),
            y: position.y.clamp(self.min_y, self.max_y),
        }
    }

    pub fn candidate(&self, candidate: Candidate) -> Position {
        match candidate {
            Candidate::TopLeft => Position::new(self.min_x, self.min_y),
            Candidate::TopRight => Position::new(self.max_x, self.min_y),
            Candidate::BottomLeft => Position::new(self.min_x, self.max_y),
            Candidate::BottomRight => Position::new(self.max_x, self.max_y),
            Candidate::Center => Position::new(
                (self.min_x + self.max_x) / 2.0,
                (self.min_y + self.max_y) / 2.0,
            ),
        }
    }
}

/// Clamp a proposed position into `[padding, dimension - padding - size]` on both
/// axes. When the element does not fit, the position is pinned to the padding.
pub fn clamp_position(
    proposed: Position,
    element: &ElementPlacement,
    template: &LabelTemplate,
) -> Position {
    Interior::for_element(element, template).clamp(proposed)
}

/// How the final position of a resolved element was chosen
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The clamped requested position was free
    Requested,
    /// The requested position collided and this candidate was free
    Relocated(Candidate),
    /// Every candidate collided; the clamped requested position is kept anyway
    Overlapping,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Resolution {
    pub position: Position,
    pub placement: Placement,
    /// The element is larger than the padded label on some axis
    pub overflowing: bool,
}

/// Resolve where `target` ends up when moved to `proposed`, given the last known
/// placements of its `siblings`. Never fails: invalid inputs are treated as zero and
/// unresolvable collisions fall back to the clamped position.
pub fn resolve_position(
    target: &ElementPlacement,
    proposed: Position,
    siblings: &[&ElementPlacement],
    template: &LabelTemplate,
) -> Resolution {
    let t = template.sanitized();
    let scale = t.scale_factor();
    let interior = Interior::for_element(target, &t);
    let clamped = interior.clamp(proposed);

    let sibling_bounds: Vec<Bounds> = siblings
        .iter()
        .map(|s| effective_bounding_box(s, scale))
        .collect();
    let collides = |position: Position| {
        let moved = ElementPlacement {
            position,
            ..*target
        };
        let bounds = effective_bounding_box(&moved, scale).inflate(t.element_spacing);
        sibling_bounds.iter().any(|s| bounds.overlaps(s))
    };

    let (position, placement) = if !collides(clamped) {
        (clamped, Placement::Requested)
    } else {
        Candidate::ORDER
            .into_iter()
            .map(|c| (interior.candidate(c), c))
            .find(|&(p, _)| !collides(p))
            .map(|(p, c)| (p, Placement::Relocated(c)))
            .unwrap_or((clamped, Placement::Overlapping))
    };

    if placement != Placement::Requested || interior.overflowing {
        debug!(
            x = position.x,
            y = position.y,
            ?placement,
            overflowing = interior.overflowing,
            "resolved element position"
        );
    }

    Resolution {
        position,
        placement,
        overflowing: interior.overflowing,
    }
}

impl Elements {
    /// Move `slot` to `proposed`, resolving it against the other three slots, and
    /// store the resolved position
    pub fn move_element(
        &mut self,
        slot: ElementSlot,
        proposed: Position,
        template: &LabelTemplate,
    ) -> Resolution {
        let target = self[slot];
        let resolution = resolve_position(&target, proposed, &self.siblings(slot), template);
        self[slot].position = resolution.position;
        resolution
    }

    /// Move `slot` by a delta from its current position
    pub fn drag_element(
        &mut self,
        slot: ElementSlot,
        dx: f32,
        dy: f32,
        template: &LabelTemplate,
    ) -> Resolution {
        let current = self[slot].position.sanitized();
        self.move_element(slot, Position::new(current.x + dx, current.y + dy), template)
    }

    /// Slots whose boxes cannot fit inside the padded label
    pub fn overflowing(&self, template: &LabelTemplate) -> Vec<ElementSlot> {
        self.iter()
            .filter(|(_, e)| Interior::for_element(e, template).overflowing)
            .map(|(slot, _)| slot)
            .collect()
    }
}
