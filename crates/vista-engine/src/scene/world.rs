use std::cell::RefCell;
use std::rc::Rc;

use crate::coords::Vec2;
use crate::error::{EngineError, Result};

use super::element::{Renderable, SharedElement};

/// Insertion-ordered collection of renderable elements with world-space
/// range queries.
///
/// An element keeps its position in iteration order for the life of the
/// scene; there is no removal. `query` is a full linear scan over all
/// elements — the accepted cost at this scale, no spatial index exists.
///
/// A scene is typically shared by reference (`Rc<RefCell<Scene>>`) between
/// the viewports that project it; viewports share nothing else.
#[derive(Default)]
pub struct Scene {
    elements: Vec<SharedElement>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends an element and returns the same handle for chaining.
    ///
    /// Fails with [`EngineError::InvalidElement`] when the element reports
    /// non-finite or inverted bounds — such geometry would silently fall out
    /// of every range query.
    pub fn add<T>(&mut self, element: Rc<RefCell<T>>) -> Result<Rc<RefCell<T>>>
    where
        T: Renderable + 'static,
    {
        let bounds = element.borrow().bounding_box();
        if !bounds.is_finite() || !bounds.is_ordered() {
            return Err(EngineError::InvalidElement(format!(
                "bounding box {bounds:?} is not a finite, ordered rectangle"
            )));
        }
        self.elements.push(element.clone());
        Ok(element)
    }

    /// Wraps a plain element value in a shared handle and adds it.
    pub fn insert<T>(&mut self, element: T) -> Result<Rc<RefCell<T>>>
    where
        T: Renderable + 'static,
    {
        self.add(Rc::new(RefCell::new(element)))
    }

    /// Returns every element whose bounding box strictly overlaps the
    /// half-open area `[position, position + size)`, in insertion order.
    ///
    /// All four overlap comparisons are strict: an element whose bounds touch
    /// an edge of the area with zero overlap width is excluded. An empty
    /// result is an empty vector, never an error.
    pub fn query(&self, position: Vec2, size: Vec2) -> Vec<SharedElement> {
        self.elements
            .iter()
            .filter(|element| element.borrow().bounding_box().overlaps_area(position, size))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Bounds;
    use crate::surface::RenderSurface;

    /// Minimal element with fixed bounds.
    #[derive(Debug)]
    struct Probe {
        bounds: Bounds,
    }

    impl Probe {
        fn at(left: f32, top: f32, right: f32, bottom: f32) -> Self {
            Self {
                bounds: Bounds::new(left, top, right, bottom),
            }
        }
    }

    impl Renderable for Probe {
        fn bounding_box(&self) -> Bounds {
            self.bounds
        }

        fn render(
            &self,
            _surface: &mut dyn RenderSurface,
            _offset: Vec2,
            _scale: Vec2,
        ) -> crate::error::Result<()> {
            Ok(())
        }
    }

    // ── add ───────────────────────────────────────────────────────────────

    #[test]
    fn add_returns_the_same_handle() {
        let mut scene = Scene::new();
        let element = Rc::new(RefCell::new(Probe::at(0.0, 0.0, 1.0, 1.0)));
        let returned = scene.add(element.clone()).unwrap();
        assert!(Rc::ptr_eq(&element, &returned));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn add_rejects_nan_bounds() {
        let mut scene = Scene::new();
        let err = scene
            .insert(Probe::at(f32::NAN, 0.0, 1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidElement(_)));
        assert!(scene.is_empty());
    }

    #[test]
    fn add_rejects_inverted_bounds() {
        let mut scene = Scene::new();
        let err = scene.insert(Probe::at(5.0, 0.0, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidElement(_)));
    }

    // ── query ─────────────────────────────────────────────────────────────

    #[test]
    fn query_empty_scene_is_empty() {
        let scene = Scene::new();
        assert!(scene.query(Vec2::zero(), Vec2::splat(100.0)).is_empty());
    }

    #[test]
    fn query_filters_by_strict_overlap() {
        let mut scene = Scene::new();
        let a = scene.insert(Probe::at(0.0, 0.0, 100.0, 100.0)).unwrap();
        let b = scene.insert(Probe::at(100.0, 100.0, 200.0, 200.0)).unwrap();
        let _far = scene.insert(Probe::at(800.0, 200.0, 900.0, 300.0)).unwrap();

        let hits = scene.query(Vec2::zero(), Vec2::splat(200.0));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].borrow().bounding_box(), a.borrow().bounding_box());
        assert_eq!(hits[1].borrow().bounding_box(), b.borrow().bounding_box());
    }

    #[test]
    fn query_excludes_edge_contact() {
        let mut scene = Scene::new();
        scene.insert(Probe::at(10.0, 0.0, 20.0, 10.0)).unwrap();
        // Area starts exactly at the element's right edge.
        assert!(
            scene
                .query(Vec2::new(20.0, 0.0), Vec2::new(10.0, 10.0))
                .is_empty()
        );
        // Nudge one unit left and it overlaps.
        assert_eq!(
            scene
                .query(Vec2::new(19.0, 0.0), Vec2::new(10.0, 10.0))
                .len(),
            1
        );
    }

    #[test]
    fn query_preserves_insertion_order() {
        let mut scene = Scene::new();
        // Insert in an order unrelated to position.
        let xs = [30.0_f32, 10.0, 50.0, 20.0, 40.0];
        for x in xs {
            scene.insert(Probe::at(x, 0.0, x + 5.0, 5.0)).unwrap();
        }

        let hits = scene.query(Vec2::zero(), Vec2::splat(100.0));
        assert_eq!(hits.len(), xs.len());
        for (hit, x) in hits.iter().zip(xs) {
            assert_eq!(hit.borrow().bounding_box().left, x);
        }
    }

    #[test]
    fn query_sees_mutation_between_calls() {
        let mut scene = Scene::new();
        let probe = scene.insert(Probe::at(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(scene.query(Vec2::zero(), Vec2::splat(50.0)).len(), 1);

        // Move the element out of the queried area; bounds are re-derived.
        probe.borrow_mut().bounds = Bounds::new(500.0, 500.0, 510.0, 510.0);
        assert!(scene.query(Vec2::zero(), Vec2::splat(50.0)).is_empty());
    }
}
