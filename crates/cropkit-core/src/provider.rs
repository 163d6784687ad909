//! Multi-resolution image sources.
//!
//! A provider advertises the display-scale ranges it has variants for and
//! serves bitmaps asynchronously through a one-shot callback. Hosts resolve
//! the variant for the current viewport scale with [`best_constraint`] and
//! re-fetch when the resolved constraint changes, so a zoomed-in view can be
//! backed by a larger variant without the caller decoding every resolution
//! up front.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::bitmap::Bitmap;

/// Display-scale range an image variant is intended for.
///
/// `LessThan(2.0)` reads as "use this variant while the display scale stays
/// below 2". [`Default`](ScaleConstraint::Default) matches any scale and
/// loses to every sized variant, so it acts as the fallback.
#[derive(Debug, Clone, Copy)]
pub enum ScaleConstraint {
    /// Suited to display scales strictly below the value.
    LessThan(f32),
    /// Suited to display scales strictly above the value.
    GreaterThan(f32),
    /// Suited to any scale; used when nothing else applies.
    Default,
}

impl ScaleConstraint {
    /// Whether a display scale falls inside this constraint's range.
    pub fn is_satisfied_by(&self, scale: f32) -> bool {
        match self {
            ScaleConstraint::LessThan(value) => scale < *value,
            ScaleConstraint::GreaterThan(value) => scale > *value,
            ScaleConstraint::Default => true,
        }
    }

    /// Distance from this constraint's boundary to a display scale.
    ///
    /// `Default` has no boundary and reports an infinite distance, so sized
    /// variants always win the selection when they apply.
    pub fn distance_to(&self, scale: f32) -> f32 {
        match self {
            ScaleConstraint::LessThan(value) | ScaleConstraint::GreaterThan(value) => {
                (value - scale).abs()
            }
            ScaleConstraint::Default => f32::INFINITY,
        }
    }

    /// Order applied when two candidates sit at the same distance.
    fn tie_rank(&self) -> u8 {
        match self {
            ScaleConstraint::LessThan(_) => 0,
            ScaleConstraint::GreaterThan(_) => 1,
            ScaleConstraint::Default => 2,
        }
    }
}

// Bit-level equality so constraints can key a variant map.
impl PartialEq for ScaleConstraint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScaleConstraint::LessThan(a), ScaleConstraint::LessThan(b)) => {
                a.to_bits() == b.to_bits()
            }
            (ScaleConstraint::GreaterThan(a), ScaleConstraint::GreaterThan(b)) => {
                a.to_bits() == b.to_bits()
            }
            (ScaleConstraint::Default, ScaleConstraint::Default) => true,
            _ => false,
        }
    }
}

impl Eq for ScaleConstraint {}

impl Hash for ScaleConstraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            ScaleConstraint::LessThan(value) | ScaleConstraint::GreaterThan(value) => {
                value.to_bits().hash(state);
            }
            ScaleConstraint::Default => {}
        }
    }
}

/// Pick the constraint that best matches a display scale.
///
/// Only constraints whose range contains the scale are considered; the one
/// with the smallest boundary distance wins, which leaves `Default` as the
/// fallback. An exact distance tie prefers `LessThan` over `GreaterThan`.
/// Returns `None` when no candidate applies.
pub fn best_constraint(constraints: &[ScaleConstraint], scale: f32) -> Option<ScaleConstraint> {
    constraints
        .iter()
        .copied()
        .filter(|constraint| constraint.is_satisfied_by(scale))
        .min_by(|a, b| {
            a.distance_to(scale)
                .partial_cmp(&b.distance_to(scale))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.tie_rank().cmp(&b.tie_rank()))
        })
}

/// One-shot delivery of a fetched bitmap. Called with `None` when the
/// provider has nothing for the request.
pub type FetchCallback = Box<dyn FnOnce(Option<Bitmap>)>;

/// Source of crop images at one or more resolutions.
///
/// `fetch` must invoke the callback exactly once, synchronously or later;
/// hosts match deliveries to requests themselves (see the controller's
/// generation guard), so a provider never has to cancel an in-flight fetch.
pub trait ImageProvider {
    /// The scale ranges this provider has variants for.
    fn constraints(&self) -> Vec<ScaleConstraint>;

    /// Fetch the variant for a constraint previously returned by
    /// [`constraints`](ImageProvider::constraints).
    fn fetch(&self, constraint: &ScaleConstraint, callback: FetchCallback);

    /// Resolve the best variant for a display scale and fetch it.
    ///
    /// Delivers `None` right away when no constraint applies.
    fn fetch_for_scale(&self, scale: f32, callback: FetchCallback) {
        match best_constraint(&self.constraints(), scale) {
            Some(constraint) => self.fetch(&constraint, callback),
            None => callback(None),
        }
    }
}

/// Provider backed by pre-decoded bitmaps, one per constraint.
///
/// Fetches complete synchronously. Suits hosts that already hold their
/// variants in memory, and doubles as the test provider.
pub struct StaticImageProvider {
    variants: HashMap<ScaleConstraint, Bitmap>,
}

impl StaticImageProvider {
    pub fn new(variants: HashMap<ScaleConstraint, Bitmap>) -> Self {
        Self { variants }
    }

    /// A provider with a single variant served at every scale.
    pub fn single(image: Bitmap) -> Self {
        let mut variants = HashMap::new();
        variants.insert(ScaleConstraint::Default, image);
        Self { variants }
    }
}

impl ImageProvider for StaticImageProvider {
    fn constraints(&self) -> Vec<ScaleConstraint> {
        self.variants.keys().copied().collect()
    }

    fn fetch(&self, constraint: &ScaleConstraint, callback: FetchCallback) {
        callback(self.variants.get(constraint).cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn solid(width: u32, height: u32) -> Bitmap {
        Bitmap::from_fill(width, height, [255, 255, 255, 255])
    }

    fn fetch_blocking(provider: &dyn ImageProvider, scale: f32) -> Option<Bitmap> {
        let received = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&received);
        provider.fetch_for_scale(scale, Box::new(move |image| *sink.borrow_mut() = Some(image)));
        let delivered = received.borrow_mut().take();
        delivered.expect("static provider delivers synchronously")
    }

    #[test]
    fn test_constraint_selection_is_deterministic() {
        let constraints = [
            ScaleConstraint::LessThan(2.0),
            ScaleConstraint::GreaterThan(3.0),
            ScaleConstraint::Default,
        ];

        assert_eq!(
            best_constraint(&constraints, 1.0),
            Some(ScaleConstraint::LessThan(2.0))
        );
        assert_eq!(
            best_constraint(&constraints, 2.5),
            Some(ScaleConstraint::Default)
        );
        assert_eq!(
            best_constraint(&constraints, 4.0),
            Some(ScaleConstraint::GreaterThan(3.0))
        );
    }

    #[test]
    fn test_resolves_exact_tie_to_less_than() {
        // 2.5 sits exactly halfway between the two boundaries
        let constraints = [
            ScaleConstraint::GreaterThan(2.0),
            ScaleConstraint::LessThan(3.0),
        ];
        assert_eq!(
            best_constraint(&constraints, 2.5),
            Some(ScaleConstraint::LessThan(3.0))
        );
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert!(!ScaleConstraint::LessThan(2.0).is_satisfied_by(2.0));
        assert!(!ScaleConstraint::GreaterThan(3.0).is_satisfied_by(3.0));
        assert!(ScaleConstraint::Default.is_satisfied_by(2.0));
    }

    #[test]
    fn test_no_applicable_constraint_resolves_to_none() {
        let constraints = [
            ScaleConstraint::LessThan(2.0),
            ScaleConstraint::GreaterThan(3.0),
        ];
        assert_eq!(best_constraint(&constraints, 2.5), None);
        assert_eq!(best_constraint(&[], 1.0), None);
    }

    #[test]
    fn test_fetch_for_scale_picks_the_nearest_variant() {
        let mut variants = HashMap::new();
        variants.insert(ScaleConstraint::LessThan(2.0), solid(32, 32));
        variants.insert(ScaleConstraint::GreaterThan(3.0), solid(128, 128));
        variants.insert(ScaleConstraint::Default, solid(64, 64));
        let provider = StaticImageProvider::new(variants);

        assert_eq!(fetch_blocking(&provider, 1.0).map(|b| b.width), Some(32));
        assert_eq!(fetch_blocking(&provider, 2.5).map(|b| b.width), Some(64));
        assert_eq!(fetch_blocking(&provider, 4.0).map(|b| b.width), Some(128));
    }

    #[test]
    fn test_single_provider_serves_every_scale() {
        let provider = StaticImageProvider::single(solid(48, 48));
        assert_eq!(fetch_blocking(&provider, 0.25).map(|b| b.width), Some(48));
        assert_eq!(fetch_blocking(&provider, 10.0).map(|b| b.width), Some(48));
    }

    #[test]
    fn test_unresolvable_scale_delivers_none() {
        let mut variants = HashMap::new();
        variants.insert(ScaleConstraint::LessThan(2.0), solid(32, 32));
        let provider = StaticImageProvider::new(variants);

        assert_eq!(fetch_blocking(&provider, 5.0), None);
    }

    #[test]
    fn test_constraints_key_a_map_by_bits() {
        let mut variants = HashMap::new();
        variants.insert(ScaleConstraint::LessThan(2.0), solid(8, 8));
        variants.insert(ScaleConstraint::LessThan(2.0), solid(16, 16));
        assert_eq!(variants.len(), 1);
        assert_eq!(
            variants.get(&ScaleConstraint::LessThan(2.0)).map(|b| b.width),
            Some(16)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
