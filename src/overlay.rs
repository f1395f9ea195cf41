//! Maps the active product and the latest detections to overlay transforms.
//!
//! The compositor owns the four fixed overlay slots (ring, necklace, left and
//! right earring) and recomputes their placement on every update. Slots are
//! never added or removed; a slot without a usable detection is hidden, with
//! its numeric fields left at their last computed values so the UI can hide
//! and re-show without layout thrash.

use crate::catalog::{JewelryKind, Product};
use crate::detection::{DetectionBatch, LandmarkGroup};
use crate::face;
use crate::geometry::Transform;
use crate::hand;
use crate::resolution::Resolution;

/// Fraction of the surface width the anchor geometry scales by, per kind.
const RING_WIDTH_FRAC: f32 = 0.15;
const NECKLACE_WIDTH_FRAC: f32 = 0.8;
const EARRING_WIDTH_FRAC: f32 = 0.3;

/// The fixed set of overlay slots.
///
/// Exactly one slot exists for ring and necklace, and two for earrings,
/// regardless of detection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlaySlot {
    Ring,
    Necklace,
    LeftEarring,
    RightEarring,
}

impl OverlaySlot {
    pub const ALL: [OverlaySlot; 4] = [
        OverlaySlot::Ring,
        OverlaySlot::Necklace,
        OverlaySlot::LeftEarring,
        OverlaySlot::RightEarring,
    ];

    /// The jewelry kind rendered in this slot.
    pub fn kind(&self) -> JewelryKind {
        match self {
            OverlaySlot::Ring => JewelryKind::Ring,
            OverlaySlot::Necklace => JewelryKind::Necklace,
            OverlaySlot::LeftEarring | OverlaySlot::RightEarring => JewelryKind::Earring,
        }
    }
}

/// Where to render one jewelry asset: pixel position, scale in pixels,
/// rotation in degrees, and visibility.
///
/// `visible == false` means "do not render". The numeric fields then hold
/// whatever was last computed; they are toggled, not deleted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayTransform {
    x: f32,
    y: f32,
    scale: f32,
    rotation: f32,
    visible: bool,
}

impl OverlayTransform {
    fn hidden() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 0.0,
            rotation: 0.0,
            visible: false,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Rotation in degrees, already negated for the mirrored selfie view.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Computes overlay transforms from the active product and the latest
/// detection batch.
///
/// All landmark selection, mirroring, and per-kind geometry rules live here.
/// Invalid geometric input never fails; it degrades to a hidden slot.
pub struct Compositor {
    slots: [OverlayTransform; 4],
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            slots: [OverlayTransform::hidden(); 4],
        }
    }

    /// Recomputes the slot transforms for this frame.
    ///
    /// `batch` must come from the session tracking the anatomy `product`
    /// attaches to: hands for rings, a face for necklaces and earrings.
    /// Placement works from the first detected group. Slots belonging to
    /// other jewelry kinds are hidden.
    pub fn update(&mut self, product: &Product, batch: &DetectionBatch, surface: Resolution) {
        for slot in OverlaySlot::ALL {
            if slot.kind() != product.kind() {
                self.slots[slot as usize].visible = false;
            }
        }

        match product.kind() {
            JewelryKind::Ring => self.place_ring(product, batch.first(), surface),
            JewelryKind::Necklace => self.place_necklace(product, batch.first(), surface),
            JewelryKind::Earring => self.place_earrings(product, batch.first(), surface),
        }
    }

    /// Returns the transform currently held by `slot`.
    pub fn slot(&self, slot: OverlaySlot) -> &OverlayTransform {
        &self.slots[slot as usize]
    }

    /// All four slots with their transforms, in render order.
    pub fn slots(&self) -> impl Iterator<Item = (OverlaySlot, &OverlayTransform)> {
        OverlaySlot::ALL
            .iter()
            .map(move |&slot| (slot, &self.slots[slot as usize]))
    }

    fn hide(&mut self, slot: OverlaySlot) {
        self.slots[slot as usize].visible = false;
    }

    fn place_ring(
        &mut self,
        product: &Product,
        group: Option<&LandmarkGroup>,
        surface: Resolution,
    ) {
        let Some((base, joint)) = group.and_then(|g| hand::ring_anchor(g.landmarks())) else {
            self.hide(OverlaySlot::Ring);
            return;
        };

        let finger = Transform::between(base, joint);
        if finger.is_degenerate() {
            self.hide(OverlaySlot::Ring);
            return;
        }

        let (px, py) = finger.position().mirror_x().to_pixels(surface);
        place(
            &mut self.slots[OverlaySlot::Ring as usize],
            px + product.offset_x(),
            py + product.offset_y(),
            finger.scale() * surface.width() as f32 * product.base_scale() * RING_WIDTH_FRAC,
            -finger.rotation_degrees(),
        );
    }

    fn place_necklace(
        &mut self,
        product: &Product,
        group: Option<&LandmarkGroup>,
        surface: Resolution,
    ) {
        let Some(landmarks) = group.map(LandmarkGroup::landmarks) else {
            self.hide(OverlaySlot::Necklace);
            return;
        };
        let Some((jaw_left, jaw_right)) = face::jaw_line(landmarks) else {
            self.hide(OverlaySlot::Necklace);
            return;
        };

        // The jaw transform carries both the face width (scale) and the
        // head's roll (rotation).
        let jaw = Transform::between(jaw_left, jaw_right);
        if jaw.is_degenerate() {
            self.hide(OverlaySlot::Necklace);
            return;
        }

        let chin = landmarks.get(face::LandmarkIdx::ChinCenter as usize);
        let (px, py) = chin.mirror_x().to_pixels(surface);
        place(
            &mut self.slots[OverlaySlot::Necklace as usize],
            px + product.offset_x(),
            py + product.offset_y(),
            jaw.scale() * surface.width() as f32 * product.base_scale() * NECKLACE_WIDTH_FRAC,
            -jaw.rotation_degrees(),
        );
    }

    fn place_earrings(
        &mut self,
        product: &Product,
        group: Option<&LandmarkGroup>,
        surface: Resolution,
    ) {
        let Some(group) = group else {
            self.hide(OverlaySlot::LeftEarring);
            self.hide(OverlaySlot::RightEarring);
            return;
        };
        let landmarks = group.landmarks();
        let Some(width) = face::width(landmarks) else {
            self.hide(OverlaySlot::LeftEarring);
            self.hide(OverlaySlot::RightEarring);
            return;
        };

        let scale = width * surface.width() as f32 * product.base_scale() * EARRING_WIDTH_FRAC;

        // Mirroring swaps which side of the screen each earlobe lands on;
        // the X offset pushes the two sides apart, so its sign flips per
        // slot. Earrings hang straight down: rotation stays 0.
        let sides = [
            (OverlaySlot::LeftEarring, face::LandmarkIdx::LeftEarlobe, 1.0),
            (
                OverlaySlot::RightEarring,
                face::LandmarkIdx::RightEarlobe,
                -1.0,
            ),
        ];
        for (slot, earlobe, offset_sign) in sides {
            let (px, py) = landmarks.get(earlobe as usize).mirror_x().to_pixels(surface);
            place(
                &mut self.slots[slot as usize],
                px + offset_sign * product.offset_x(),
                py + product.offset_y(),
                scale,
                0.0,
            );
        }
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a computed placement, or hides the slot when the geometry is
/// unusable (zero or non-finite values). A hidden slot keeps its previous
/// numeric fields.
fn place(slot: &mut OverlayTransform, x: f32, y: f32, scale: f32, rotation: f32) {
    if !(scale > 0.0) || !x.is_finite() || !y.is_finite() || !scale.is_finite() || !rotation.is_finite()
    {
        slot.visible = false;
        return;
    }

    *slot = OverlayTransform {
        x,
        y,
        scale,
        rotation,
        visible: true,
    };
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::Point;
    use crate::landmark::Landmarks;

    fn surface() -> Resolution {
        Resolution::new(1000, 1000)
    }

    fn hand_landmarks() -> Landmarks {
        let mut landmarks = Landmarks::new(hand::NUM_LANDMARKS);
        // Index finger pointing straight up.
        landmarks.set(
            hand::LandmarkIdx::IndexFingerMcp as usize,
            Point::new(0.4, 0.6),
        );
        landmarks.set(
            hand::LandmarkIdx::IndexFingerPip as usize,
            Point::new(0.4, 0.5),
        );
        landmarks
    }

    fn face_landmarks() -> Landmarks {
        let mut landmarks = Landmarks::new(face::NUM_LANDMARKS);
        landmarks.set(face::LandmarkIdx::ChinCenter as usize, Point::new(0.5, 0.8));
        landmarks.set(face::LandmarkIdx::LeftJaw as usize, Point::new(0.35, 0.5));
        landmarks.set(face::LandmarkIdx::RightJaw as usize, Point::new(0.65, 0.5));
        landmarks.set(
            face::LandmarkIdx::LeftEarlobe as usize,
            Point::new(0.3, 0.45),
        );
        landmarks.set(
            face::LandmarkIdx::RightEarlobe as usize,
            Point::new(0.7, 0.45),
        );
        landmarks
    }

    fn batch_of(landmarks: Landmarks) -> DetectionBatch {
        let mut batch = DetectionBatch::new();
        batch.push(LandmarkGroup::new(landmarks, 0.9));
        batch
    }

    #[test]
    fn ring_placement() {
        let product = Product::new("ring", JewelryKind::Ring, 1.0);
        let mut compositor = Compositor::new();
        compositor.update(&product, &batch_of(hand_landmarks()), surface());

        let ring = compositor.slot(OverlaySlot::Ring);
        assert!(ring.is_visible());
        // Midpoint (0.4, 0.55), mirrored to (0.6, 0.55).
        assert_relative_eq!(ring.x(), 600.0, epsilon = 1e-3);
        assert_relative_eq!(ring.y(), 550.0, epsilon = 1e-3);
        assert_relative_eq!(ring.scale(), 0.1 * 1000.0 * 0.15, epsilon = 1e-3);
        // Finger points up (-90°), negated for the mirrored view.
        assert_relative_eq!(ring.rotation(), 90.0, epsilon = 1e-3);

        // Slots of other jewelry kinds stay hidden.
        assert!(!compositor.slot(OverlaySlot::Necklace).is_visible());
        assert!(!compositor.slot(OverlaySlot::LeftEarring).is_visible());
    }

    #[test]
    fn necklace_placement() {
        let product = Product::new("necklace", JewelryKind::Necklace, 1.0).with_offsets(0.0, 12.0);
        let mut compositor = Compositor::new();
        compositor.update(&product, &batch_of(face_landmarks()), surface());

        let necklace = compositor.slot(OverlaySlot::Necklace);
        assert!(necklace.is_visible());
        assert_relative_eq!(necklace.x(), 500.0, epsilon = 1e-3);
        assert_relative_eq!(necklace.y(), 812.0, epsilon = 1e-3);
        // Face width is the jaw distance (0.3).
        assert_relative_eq!(necklace.scale(), 0.3 * 1000.0 * 0.8, epsilon = 1e-3);
        assert_relative_eq!(necklace.rotation(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn earrings_come_in_mirrored_pairs() {
        let product = Product::new("earring", JewelryKind::Earring, 1.0).with_offsets(5.0, 0.0);
        let mut compositor = Compositor::new();
        compositor.update(&product, &batch_of(face_landmarks()), surface());

        let left = *compositor.slot(OverlaySlot::LeftEarring);
        let right = *compositor.slot(OverlaySlot::RightEarring);
        assert!(left.is_visible());
        assert!(right.is_visible());

        // Left earlobe (0.3) mirrors to x=700 plus the offset; right earlobe
        // (0.7) mirrors to x=300 minus it. The pair stays symmetric around
        // the surface center.
        assert_relative_eq!(left.x(), 705.0, epsilon = 1e-3);
        assert_relative_eq!(right.x(), 295.0, epsilon = 1e-3);
        assert_relative_eq!(left.x() - 500.0, 500.0 - right.x(), epsilon = 1e-3);

        assert_relative_eq!(left.scale(), right.scale(), epsilon = 1e-6);
        assert_relative_eq!(left.rotation(), 0.0);
        assert_relative_eq!(right.rotation(), 0.0);
    }

    #[test]
    fn lost_detection_hides_but_keeps_fields() {
        let product = Product::new("ring", JewelryKind::Ring, 1.0);
        let mut compositor = Compositor::new();
        compositor.update(&product, &batch_of(hand_landmarks()), surface());
        let placed = *compositor.slot(OverlaySlot::Ring);
        assert!(placed.is_visible());

        compositor.update(&product, &DetectionBatch::new(), surface());
        let lost = compositor.slot(OverlaySlot::Ring);
        assert!(!lost.is_visible());
        // Numeric fields are stale, not reset.
        assert_eq!(lost.x(), placed.x());
        assert_eq!(lost.y(), placed.y());
        assert_eq!(lost.scale(), placed.scale());
    }

    #[test]
    fn degenerate_geometry_is_hidden_not_an_error() {
        let product = Product::new("ring", JewelryKind::Ring, 1.0);
        let mut compositor = Compositor::new();
        // All hand landmarks coincide at the origin: zero-length anchor.
        compositor.update(
            &product,
            &batch_of(Landmarks::new(hand::NUM_LANDMARKS)),
            surface(),
        );
        assert!(!compositor.slot(OverlaySlot::Ring).is_visible());
    }

    #[test]
    fn incomplete_topology_is_hidden() {
        let product = Product::new("necklace", JewelryKind::Necklace, 1.0);
        let mut compositor = Compositor::new();
        // A hand batch cannot place face jewelry.
        compositor.update(&product, &batch_of(hand_landmarks()), surface());
        assert!(!compositor.slot(OverlaySlot::Necklace).is_visible());
    }

    #[test]
    fn every_slot_always_exists() {
        let compositor = Compositor::new();
        assert_eq!(compositor.slots().count(), 4);
        assert!(compositor.slots().all(|(_, t)| !t.is_visible()));
    }
}
