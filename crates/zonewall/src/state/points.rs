//! Fixed-capacity marker store

use shared::{Point3, ZONE_POINT_COUNT};

use crate::error::ZoneError;

/// Ordered store for up to four zone markers.
///
/// Capacity is a domain invariant: once four points are in, the store is
/// full and read-only until [`PointStore::reset`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointStore {
    points: [Point3; ZONE_POINT_COUNT],
    len: usize,
}

impl PointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point. Returns `false` and leaves the store untouched when full.
    pub fn try_add(&mut self, point: Point3) -> bool {
        if self.is_full() {
            return false;
        }
        self.points[self.len] = point;
        self.len += 1;
        true
    }

    pub fn is_full(&self) -> bool {
        self.len == ZONE_POINT_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Point at `index`, bounds-checked against the populated range
    pub fn get(&self, index: usize) -> Result<Point3, ZoneError> {
        self.as_slice()
            .get(index)
            .copied()
            .ok_or(ZoneError::IndexOutOfRange {
                index,
                len: self.len,
            })
    }

    /// Populated points in insertion order
    pub fn as_slice(&self) -> &[Point3] {
        &self.points[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point3> {
        self.as_slice().iter()
    }

    /// All four points, or `None` while the store is still filling
    pub fn to_array(&self) -> Option<[Point3; ZONE_POINT_COUNT]> {
        self.is_full().then_some(self.points)
    }

    pub fn reset(&mut self) {
        self.points = [Point3::default(); ZONE_POINT_COUNT];
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, z: f64) -> Point3 {
        Point3::new(x, 0.0, z)
    }

    #[test]
    fn test_fills_to_capacity() {
        let mut store = PointStore::new();
        assert!(store.is_empty());
        for i in 0..4 {
            assert!(!store.is_full());
            assert!(store.try_add(p(i as f64, 0.0)));
            assert_eq!(store.len(), i + 1);
        }
        assert!(store.is_full());
    }

    #[test]
    fn test_fifth_point_rejected() {
        let mut store = PointStore::new();
        for i in 0..4 {
            store.try_add(p(i as f64, 1.0));
        }
        let before = store.clone();

        assert!(!store.try_add(p(9.0, 9.0)));
        assert!(!store.try_add(p(10.0, 10.0)));
        assert_eq!(store, before);
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut store = PointStore::new();
        store.try_add(p(3.0, 0.0));
        store.try_add(p(1.0, 0.0));
        store.try_add(p(2.0, 0.0));
        let xs: Vec<f64> = store.iter().map(|pt| pt.x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_get_out_of_populated_range() {
        let mut store = PointStore::new();
        store.try_add(p(1.0, 2.0));

        assert_eq!(store.get(0).unwrap(), p(1.0, 2.0));
        match store.get(1) {
            Err(ZoneError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("Expected IndexOutOfRange, got {other:?}"),
        }
        assert!(store.get(7).is_err());
    }

    #[test]
    fn test_to_array_only_when_full() {
        let mut store = PointStore::new();
        store.try_add(p(0.0, 0.0));
        assert!(store.to_array().is_none());
        store.try_add(p(1.0, 0.0));
        store.try_add(p(1.0, 1.0));
        store.try_add(p(0.0, 1.0));
        let arr = store.to_array().unwrap();
        assert_eq!(arr[2], p(1.0, 1.0));
    }

    #[test]
    fn test_reset_clears() {
        let mut store = PointStore::new();
        for i in 0..4 {
            store.try_add(p(i as f64, 0.0));
        }
        store.reset();
        assert!(store.is_empty());
        assert!(store.get(0).is_err());
        assert!(store.try_add(p(5.0, 5.0)));
    }
}
