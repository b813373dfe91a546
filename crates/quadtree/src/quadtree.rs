//! Point quadtree with lazy subdivision, range queries and branch-and-bound
//! nearest-neighbor search.
use crate::config::{TreeConfig, DEFAULT_CAPACITY, DEFAULT_DEPTH};
use crate::error::{QuadTreeError, Result};
use crate::geometry::{Quadrant, QueryShape, Rectangle};
use crate::types::Point;
use serde::Serialize;
use tracing::{debug, trace, warn};

/// A node of the quadtree. Every node is itself a complete tree over its
/// boundary, so the root is just the outermost node.
///
/// A node starts as a leaf holding up to `capacity` points. The first insert
/// past capacity splits it into four children (NE, NW, SE, SW) and moves its
/// points down; from then on it stores nothing itself. Each split spends one
/// unit of the depth budget. A leaf whose budget is spent accepts any number
/// of points, which bounds recursion on clustered input.
#[derive(Debug, Clone)]
pub struct QuadTree<T> {
    /// Region this node is responsible for
    boundary: Rectangle,
    /// Points a leaf holds before subdividing
    capacity: usize,
    /// Remaining subdivisions allowed below this node
    depth: u32,
    /// Points stored here (only while a leaf)
    points: Vec<Point<T>>,
    /// Child nodes in NE, NW, SE, SW order - None while a leaf
    children: Option<Box<[QuadTree<T>; 4]>>,
}

impl<T> QuadTree<T> {
    /// Creates an empty tree with the default depth budget.
    ///
    /// # Errors
    ///
    /// Returns [`QuadTreeError::InvalidArgument`] when `capacity` is zero or
    /// the boundary is not finite.
    pub fn new(boundary: Rectangle, capacity: usize) -> Result<Self> {
        Self::with_depth(boundary, capacity, DEFAULT_DEPTH)
    }

    /// Creates an empty tree with an explicit depth budget.
    ///
    /// # Arguments
    ///
    /// * `boundary` - Region covered by the tree
    /// * `capacity` - Points a leaf holds before subdividing, at least 1
    /// * `depth` - Maximum number of subdivisions along any branch
    pub fn with_depth(boundary: Rectangle, capacity: usize, depth: u32) -> Result<Self> {
        if !boundary.is_finite() {
            return Err(QuadTreeError::invalid("boundary should be a finite Rectangle"));
        }
        if capacity < 1 {
            return Err(QuadTreeError::invalid("capacity must be greater than 0"));
        }
        Ok(Self::leaf(boundary, capacity, depth))
    }

    /// Creates a tree over `boundary`, using the default capacity when none is
    /// given.
    pub fn from_boundary(boundary: Rectangle, capacity: Option<usize>) -> Result<Self> {
        Self::new(boundary, capacity.unwrap_or(DEFAULT_CAPACITY))
    }

    /// Creates a tree over the rectangle centered at `(x, y)` with size
    /// `w` x `h`, using the default capacity when none is given.
    pub fn from_bounds(x: f64, y: f64, w: f64, h: f64, capacity: Option<usize>) -> Result<Self> {
        Self::from_boundary(Rectangle::new(x, y, w, h), capacity)
    }

    /// Creates a tree covering `(0, 0)..(width, height)` from a config.
    ///
    /// # Errors
    ///
    /// Fails when the config carries no width or no height, or when its
    /// capacity is zero.
    pub fn from_config(config: &TreeConfig) -> Result<Self> {
        let width = config
            .width
            .ok_or_else(|| QuadTreeError::invalid("No global width defined"))?;
        let height = config
            .height
            .ok_or_else(|| QuadTreeError::invalid("No global height defined"))?;
        let boundary = Rectangle::new(width / 2.0, height / 2.0, width, height);
        Self::with_depth(boundary, config.capacity, config.depth)
    }

    fn leaf(boundary: Rectangle, capacity: usize, depth: u32) -> Self {
        Self {
            boundary,
            capacity,
            depth,
            points: Vec::new(),
            children: None,
        }
    }

    /// Region covered by this node.
    pub fn boundary(&self) -> &Rectangle {
        &self.boundary
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remaining depth budget of this node.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether this node has been split into four children.
    pub fn is_divided(&self) -> bool {
        self.children.is_some()
    }

    /// Points stored directly in this node. Always empty once divided.
    pub fn points(&self) -> &[Point<T>] {
        &self.points
    }

    /// The four children in NE, NW, SE, SW order, if divided.
    pub fn children(&self) -> Option<&[QuadTree<T>; 4]> {
        self.children.as_deref()
    }

    /// Inserts a point, returning `false` if it lies outside the tree.
    ///
    /// A rejected point is dropped and the tree is left unchanged. Use
    /// [`try_insert`](Self::try_insert) to get the point back.
    pub fn insert(&mut self, point: Point<T>) -> bool {
        match self.try_insert(point) {
            Ok(()) => true,
            Err(rejected) => {
                trace!(x = rejected.x(), y = rejected.y(), "Point outside quadtree boundary");
                false
            }
        }
    }

    /// Inserts a point, handing it back if it lies outside the tree.
    ///
    /// Divided nodes offer the point to their children in NE, NW, SE, SW
    /// order and the first child that accepts it keeps it. Since containment
    /// is inclusive, a point on a dividing line goes to the first of the
    /// touching quadrants.
    pub fn try_insert(&mut self, point: Point<T>) -> std::result::Result<(), Point<T>> {
        if !self.boundary.contains(&point) {
            return Err(point);
        }
        self.store(point);
        Ok(())
    }

    /// Stores a point that belongs to this node, subdividing on overflow.
    ///
    /// Child edges are computed in floating point and may leave a sliver of
    /// the parent uncovered. A point caught in such a sliver goes to the
    /// closest child instead of being lost.
    fn store(&mut self, point: Point<T>) {
        if let Some(children) = self.children.as_deref_mut() {
            let mut point = point;
            for child in children.iter_mut() {
                match child.try_insert(point) {
                    Ok(()) => return,
                    Err(rejected) => point = rejected,
                }
            }
            warn!(
                x = point.x(),
                y = point.y(),
                "Point missed every child boundary, storing it in the nearest child"
            );
            self.adopt(point);
            return;
        }

        if self.depth == 0 || self.points.len() < self.capacity {
            self.points.push(point);
            return;
        }

        self.subdivide();

        let points = std::mem::take(&mut self.points);
        for existing in points {
            self.store(existing);
        }
        self.store(point);
    }

    /// Splits this leaf into four children. Points are not moved here.
    fn subdivide(&mut self) {
        let depth = self.depth - 1;
        let children = Quadrant::ALL
            .map(|quadrant| Self::leaf(self.boundary.subdivide(quadrant), self.capacity, depth));
        self.children = Some(Box::new(children));

        debug!(
            x = self.boundary.x(),
            y = self.boundary.y(),
            w = self.boundary.w(),
            h = self.boundary.h(),
            remaining_depth = depth,
            "Subdivided quadtree node"
        );
    }

    /// Hands a point to the child closest to it. The child stores it like any
    /// other point, so capacity and depth rules still apply there.
    fn adopt(&mut self, point: Point<T>) {
        let Some(children) = self.children.as_deref_mut() else {
            self.store(point);
            return;
        };
        let index = (0..children.len())
            .min_by(|&a, &b| {
                let da = children[a].boundary.distance_from(&point);
                let db = children[b].boundary.distance_from(&point);
                da.total_cmp(&db)
            })
            .unwrap_or(0);
        children[index].store(point);
    }

    /// Returns every stored point inside `range`.
    ///
    /// Works with any [`QueryShape`], e.g. a [`Rectangle`] or a
    /// [`Circle`](crate::Circle). Results come in no particular order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quadtree::{Circle, Point, QuadTree, Rectangle};
    ///
    /// let mut tree = QuadTree::new(Rectangle::new(0.0, 0.0, 100.0, 100.0), 4).unwrap();
    /// tree.insert(Point::new(1.0, 1.0, "near"));
    /// tree.insert(Point::new(40.0, 40.0, "far"));
    ///
    /// let found = tree.query(&Circle::new(0.0, 0.0, 5.0));
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(*found[0].payload(), "near");
    /// ```
    pub fn query<S: QueryShape>(&self, range: &S) -> Vec<&Point<T>> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    /// Appends every stored point inside `range` to `found`.
    ///
    /// The buffer is not cleared first, so it can be reused across queries or
    /// shared between several trees.
    pub fn query_into<'a, S: QueryShape>(&'a self, range: &S, found: &mut Vec<&'a Point<T>>) {
        if !range.intersects(&self.boundary) {
            return;
        }

        found.extend(self.points.iter().filter(|point| range.contains(*point)));

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query_into(range, found);
            }
        }
    }

    /// Returns up to `max_count` points within `max_distance` of `search`,
    /// closest first.
    ///
    /// Points at equal distance keep the order in which the search met them.
    ///
    /// # Errors
    ///
    /// Returns [`QuadTreeError::InvalidArgument`] when `search` has a
    /// non-finite coordinate or `max_distance` is NaN.
    pub fn closest<U>(
        &self,
        search: &Point<U>,
        max_count: usize,
        max_distance: f64,
    ) -> Result<Vec<&Point<T>>> {
        if !search.is_finite() {
            return Err(QuadTreeError::invalid("Method 'closest' needs a point"));
        }
        if max_distance.is_nan() {
            return Err(QuadTreeError::invalid("max_distance must be a number"));
        }

        let nearest = self.k_nearest(search, max_count, max_distance, 0.0, 0);
        Ok(nearest.found.into_iter().map(|(_, point)| point).collect())
    }

    /// The single closest point to `search`, if the tree holds any.
    pub fn nearest<U>(&self, search: &Point<U>) -> Result<Option<&Point<T>>> {
        Ok(self.closest(search, 1, f64::INFINITY)?.into_iter().next())
    }

    /// Branch-and-bound step.
    ///
    /// `furthest_distance` is the largest distance among candidates accepted
    /// so far and `found_so_far` their count. A subtree or point is visited
    /// while fewer than `max_count` candidates exist or while it could still
    /// beat the furthest one.
    fn k_nearest<'a, U>(
        &'a self,
        search: &Point<U>,
        max_count: usize,
        max_distance: f64,
        mut furthest_distance: f64,
        mut found_so_far: usize,
    ) -> Candidates<'a, T> {
        let mut found = Vec::new();

        if let Some(children) = &self.children {
            let mut ordered: Vec<(f64, &'a QuadTree<T>)> = children
                .iter()
                .map(|child| (child.boundary.distance_from(search), child))
                .collect();
            ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

            for (distance, child) in ordered {
                if distance > max_distance {
                    continue;
                }
                if found_so_far < max_count || distance < furthest_distance {
                    let result = child.k_nearest(
                        search,
                        max_count,
                        max_distance,
                        furthest_distance,
                        found_so_far,
                    );
                    found_so_far += result.found.len();
                    furthest_distance = result.furthest_distance;
                    found.extend(result.found);
                }
            }
        }

        for point in &self.points {
            let distance = point.distance_from(search);
            if distance > max_distance {
                continue;
            }
            if found_so_far < max_count || distance < furthest_distance {
                found.push((distance, point));
                furthest_distance = furthest_distance.max(distance);
                found_so_far += 1;
            }
        }

        found.sort_by(|a, b| a.0.total_cmp(&b.0));
        found.truncate(max_count);

        Candidates {
            found,
            furthest_distance,
        }
    }

    /// Calls `f` on every stored point: local points first, then each child
    /// in NE, NW, SE, SW order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&Point<T>),
    {
        self.iter().for_each(f);
    }

    /// Iterates over every stored point in [`for_each`](Self::for_each)
    /// order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Total number of points in this subtree. Walks the whole subtree.
    pub fn len(&self) -> usize {
        let below = self
            .children
            .as_ref()
            .map_or(0, |children| children.iter().map(QuadTree::len).sum());
        self.points.len() + below
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Consumes the tree, returning its points in iteration order.
    pub fn into_points(self) -> Vec<Point<T>> {
        let mut points = Vec::new();
        self.collect_into(&mut points);
        points
    }

    fn collect_into(self, out: &mut Vec<Point<T>>) {
        out.extend(self.points);
        if let Some(children) = self.children {
            let children: [QuadTree<T>; 4] = *children;
            for child in children {
                child.collect_into(out);
            }
        }
    }

    /// Builds a new tree holding the points of both `self` and `other`.
    ///
    /// The new boundary is the union of both boundaries and the default depth
    /// budget is used. Nothing of the source layouts is reused: every point is
    /// cloned and inserted again, `self` first. Both inputs are untouched.
    pub fn merge(&self, other: &Self, capacity: usize) -> Result<Self>
    where
        T: Clone,
    {
        let mut merged = Self::new(self.boundary.union(&other.boundary), capacity)?;
        for point in self.iter().chain(other.iter()) {
            merged.store(point.clone());
        }

        debug!(points = merged.len(), capacity, "Merged quadtrees");
        Ok(merged)
    }

    /// Like [`merge`](Self::merge) but consumes both trees and moves their
    /// points instead of cloning them.
    pub fn merge_owned(self, other: Self, capacity: usize) -> Result<Self> {
        let mut merged = Self::new(self.boundary.union(&other.boundary), capacity)?;
        for point in self.into_points().into_iter().chain(other.into_points()) {
            merged.store(point);
        }

        debug!(points = merged.len(), capacity, "Merged quadtrees");
        Ok(merged)
    }

    /// Gets statistics about this subtree.
    pub fn stats(&self) -> NodeStats {
        let mut stats = NodeStats {
            total_points: self.points.len(),
            max_depth: 0,
            leaf_nodes: 0,
            internal_nodes: 0,
        };

        match &self.children {
            None => stats.leaf_nodes = 1,
            Some(children) => {
                stats.internal_nodes = 1;
                for child in children.iter() {
                    let child_stats = child.stats();
                    stats.total_points += child_stats.total_points;
                    stats.max_depth = stats.max_depth.max(child_stats.max_depth + 1);
                    stats.leaf_nodes += child_stats.leaf_nodes;
                    stats.internal_nodes += child_stats.internal_nodes;
                }
            }
        }

        stats
    }
}

/// Candidates collected by one nearest-neighbor step, paired with their
/// distance to the search point.
struct Candidates<'a, T> {
    found: Vec<(f64, &'a Point<T>)>,
    furthest_distance: f64,
}

/// Structure statistics for a subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NodeStats {
    /// Points stored anywhere in the subtree
    pub total_points: usize,
    /// Levels of subdivision below the subtree root
    pub max_depth: u32,
    pub leaf_nodes: usize,
    pub internal_nodes: usize,
}

/// Borrowing iterator over the points of a tree.
///
/// Created by [`QuadTree::iter`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    current: std::slice::Iter<'a, Point<T>>,
    pending: Vec<&'a QuadTree<T>>,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: &'a QuadTree<T>) -> Self {
        let mut iter = Self {
            current: root.points.iter(),
            pending: Vec::new(),
        };
        iter.push_children(root);
        iter
    }

    /// Children go on the stack reversed so NE comes off first.
    fn push_children(&mut self, node: &'a QuadTree<T>) {
        if let Some(children) = &node.children {
            self.pending.extend(children.iter().rev());
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a Point<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(point) = self.current.next() {
                return Some(point);
            }
            let node = self.pending.pop()?;
            self.current = node.points.iter();
            self.push_children(node);
        }
    }
}

impl<'a, T> IntoIterator for &'a QuadTree<T> {
    type Item = &'a Point<T>;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Circle;

    fn square(size: f64) -> Rectangle {
        Rectangle::new(0.0, 0.0, size, size)
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let result = QuadTree::<()>::new(square(10.0), 0);
        match result {
            Err(QuadTreeError::InvalidArgument(message)) => {
                assert_eq!(message, "capacity must be greater than 0");
            }
            other => panic!("expected invalid argument, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_rejects_non_finite_boundary() {
        let result = QuadTree::<()>::new(Rectangle::new(f64::NAN, 0.0, 10.0, 10.0), 4);
        assert!(matches!(result, Err(QuadTreeError::InvalidArgument(_))));
    }

    #[test]
    fn test_constructors_apply_defaults() {
        let tree = QuadTree::<()>::new(square(10.0), 3).unwrap();
        assert_eq!(tree.capacity(), 3);
        assert_eq!(tree.depth(), DEFAULT_DEPTH);
        assert!(!tree.is_divided());

        let tree = QuadTree::<()>::from_boundary(square(10.0), None).unwrap();
        assert_eq!(tree.capacity(), DEFAULT_CAPACITY);

        let tree = QuadTree::<()>::from_bounds(1.0, 2.0, 3.0, 4.0, Some(5)).unwrap();
        assert_eq!(tree.boundary(), &Rectangle::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(tree.capacity(), 5);

        let tree = QuadTree::<()>::with_depth(square(10.0), 2, 3).unwrap();
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_from_config() {
        let tree = QuadTree::<()>::from_config(&TreeConfig::with_dimensions(800.0, 600.0)).unwrap();
        assert_eq!(tree.boundary(), &Rectangle::new(400.0, 300.0, 800.0, 600.0));
        assert_eq!(tree.capacity(), DEFAULT_CAPACITY);
        assert_eq!(tree.depth(), DEFAULT_DEPTH);

        let err = QuadTree::<()>::from_config(&TreeConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "No global width defined");

        let config = TreeConfig {
            width: Some(10.0),
            ..TreeConfig::default()
        };
        let err = QuadTree::<()>::from_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "No global height defined");
    }

    #[test]
    fn test_bounds_checking() {
        let mut tree = QuadTree::new(square(100.0), 4).unwrap();

        assert!(!tree.insert(Point::new(200.0, 200.0, 1)));
        assert_eq!(tree.len(), 0);

        let rejected = tree.try_insert(Point::new(-51.0, 0.0, 2)).unwrap_err();
        assert_eq!(*rejected.payload(), 2);
        assert!(tree.is_empty());
        assert!(!tree.is_divided());
    }

    #[test]
    fn test_subdivides_on_first_overflow() {
        let mut tree = QuadTree::new(square(100.0), 2).unwrap();

        assert!(tree.insert(Point::new(-10.0, -10.0, 0)));
        assert!(tree.insert(Point::new(10.0, 10.0, 1)));
        assert!(!tree.is_divided());

        assert!(tree.insert(Point::new(20.0, -20.0, 2)));
        assert!(tree.is_divided());
        assert!(tree.points().is_empty());
        assert_eq!(tree.len(), 3);

        let children = tree.children().unwrap();
        for child in children {
            assert_eq!(child.depth(), DEFAULT_DEPTH - 1);
            assert_eq!(child.capacity(), 2);
            assert_eq!(child.boundary().w(), 50.0);
            assert_eq!(child.boundary().h(), 50.0);
        }
        // NE holds (20, -20), NW holds (-10, -10), SE holds (10, 10)
        assert_eq!(children[0].points().len(), 1);
        assert_eq!(children[1].points().len(), 1);
        assert_eq!(children[2].points().len(), 1);
        assert!(children[3].points().is_empty());
    }

    #[test]
    fn test_depth_exhaustion_disables_capacity() {
        let mut tree = QuadTree::with_depth(square(10.0), 1, 0).unwrap();
        for i in 0..50 {
            assert!(tree.insert(Point::new(1.0, 1.0, i)));
        }
        assert!(!tree.is_divided());
        assert_eq!(tree.points().len(), 50);
    }

    #[test]
    fn test_identical_points_stop_at_depth_budget() {
        let mut tree = QuadTree::with_depth(square(16.0), 1, 3).unwrap();
        for i in 0..10 {
            assert!(tree.insert(Point::new(1.0, 1.0, i)));
        }
        assert_eq!(tree.len(), 10);
        let stats = tree.stats();
        assert_eq!(stats.max_depth, 3);
        assert_eq!(stats.total_points, 10);
    }

    #[test]
    fn test_point_on_dividing_line_goes_to_first_quadrant() {
        let mut tree = QuadTree::new(square(40.0), 1).unwrap();
        assert!(tree.insert(Point::new(-5.0, 5.0, "sw")));
        assert!(tree.insert(Point::new(0.0, 0.0, "center")));

        let children = tree.children().unwrap();
        // The center touches all four quadrants; NE is offered it first
        assert_eq!(*children[0].points()[0].payload(), "center");
        assert_eq!(*children[3].points()[0].payload(), "sw");
    }

    #[test]
    fn test_query_rectangle_and_circle() {
        let mut tree = QuadTree::new(square(100.0), 2).unwrap();
        for (i, (x, y)) in [(0.0, 0.0), (10.0, 10.0), (-30.0, 20.0), (45.0, -45.0), (3.0, 4.0)]
            .into_iter()
            .enumerate()
        {
            assert!(tree.insert(Point::new(x, y, i)));
        }

        let mut in_rect: Vec<usize> = tree
            .query(&Rectangle::new(5.0, 5.0, 12.0, 12.0))
            .into_iter()
            .map(|p| *p.payload())
            .collect();
        in_rect.sort_unstable();
        assert_eq!(in_rect, vec![0, 1, 4]);

        let mut in_circle: Vec<usize> = tree
            .query(&Circle::new(0.0, 0.0, 5.0))
            .into_iter()
            .map(|p| *p.payload())
            .collect();
        in_circle.sort_unstable();
        assert_eq!(in_circle, vec![0, 4]);

        assert!(tree.query(&Rectangle::new(500.0, 500.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn test_query_into_accumulates() {
        let mut tree = QuadTree::new(square(100.0), 4).unwrap();
        tree.insert(Point::new(1.0, 1.0, 'a'));
        tree.insert(Point::new(-1.0, -1.0, 'b'));

        let mut found = Vec::new();
        tree.query_into(&Circle::new(1.0, 1.0, 0.5), &mut found);
        tree.query_into(&Circle::new(-1.0, -1.0, 0.5), &mut found);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_closest_orders_by_distance() {
        let mut tree = QuadTree::new(square(100.0), 1).unwrap();
        for (i, x) in [30.0, -5.0, 12.0, 1.0, -40.0].into_iter().enumerate() {
            tree.insert(Point::new(x, 0.0, i));
        }
        let origin = Point::new(0.0, 0.0, ());

        let found: Vec<usize> = tree
            .closest(&origin, 3, f64::INFINITY)
            .unwrap()
            .into_iter()
            .map(|p| *p.payload())
            .collect();
        assert_eq!(found, vec![3, 1, 2]);

        let within: Vec<usize> = tree
            .closest(&origin, 10, 12.0)
            .unwrap()
            .into_iter()
            .map(|p| *p.payload())
            .collect();
        assert_eq!(within, vec![3, 1, 2]);

        assert_eq!(*tree.nearest(&Point::new(-39.0, 1.0, ())).unwrap().unwrap().payload(), 4);
        assert!(tree.closest(&origin, 0, f64::INFINITY).unwrap().is_empty());
    }

    #[test]
    fn test_closest_on_empty_tree() {
        let tree = QuadTree::<()>::new(square(10.0), 4).unwrap();
        assert!(tree.nearest(&Point::new(0.0, 0.0, ())).unwrap().is_none());
    }

    #[test]
    fn test_closest_rejects_bad_arguments() {
        let tree = QuadTree::<()>::new(square(10.0), 4).unwrap();

        let err = tree.closest(&Point::new(f64::NAN, 0.0, ()), 1, 1.0).unwrap_err();
        assert_eq!(err.to_string(), "Method 'closest' needs a point");

        let err = tree.closest(&Point::new(0.0, 0.0, ()), 1, f64::NAN).unwrap_err();
        assert!(matches!(err, QuadTreeError::InvalidArgument(_)));
    }

    #[test]
    fn test_iteration_order() {
        let mut tree = QuadTree::new(square(40.0), 1).unwrap();
        // SW, then NE: the split sends SW down first
        tree.insert(Point::new(-10.0, 10.0, "sw"));
        tree.insert(Point::new(10.0, -10.0, "ne"));
        tree.insert(Point::new(-10.0, -10.0, "nw"));
        tree.insert(Point::new(10.0, 10.0, "se"));

        let order: Vec<&str> = tree.iter().map(|p| *p.payload()).collect();
        assert_eq!(order, vec!["ne", "nw", "se", "sw"]);

        let mut visited = Vec::new();
        tree.for_each(|p| visited.push(*p.payload()));
        assert_eq!(visited, order);

        let owned: Vec<&str> = tree.clone().into_points().into_iter().map(Point::into_payload).collect();
        assert_eq!(owned, order);
    }

    #[test]
    fn test_merge_keeps_every_point() {
        let mut left = QuadTree::new(Rectangle::new(-50.0, 0.0, 100.0, 100.0), 2).unwrap();
        let mut right = QuadTree::new(Rectangle::new(80.0, 30.0, 40.0, 40.0), 2).unwrap();
        for i in 0..10 {
            let offset = i as f64;
            assert!(left.insert(Point::new(-90.0 + offset * 8.0, -40.0 + offset * 8.0, i)));
            assert!(right.insert(Point::new(61.0 + offset * 3.0, 11.0 + offset * 3.0, 100 + i)));
        }

        let merged = left.merge(&right, 3).unwrap();
        assert_eq!(merged.len(), left.len() + right.len());
        assert_eq!(merged.capacity(), 3);
        assert_eq!(merged.depth(), DEFAULT_DEPTH);
        assert_eq!(merged.boundary().left(), -100.0);
        assert_eq!(merged.boundary().right(), 100.0);
        assert_eq!(merged.boundary().top(), -50.0);
        assert_eq!(merged.boundary().bottom(), 50.0);

        // Sources are untouched
        assert_eq!(left.len(), 10);
        assert_eq!(right.len(), 10);

        let everything = Rectangle::new(0.0, 0.0, f64::MAX, f64::MAX);
        assert_eq!(merged.query(&everything).len(), 20);

        let owned = left.merge_owned(right, 3).unwrap();
        assert_eq!(owned.len(), 20);
    }

    #[test]
    fn test_merge_rejects_zero_capacity() {
        let a = QuadTree::<()>::new(square(10.0), 1).unwrap();
        let b = QuadTree::<()>::new(square(10.0), 1).unwrap();
        assert!(a.merge(&b, 0).is_err());
    }

    #[test]
    fn test_stats_tracking() {
        let mut tree = QuadTree::new(square(100.0), 1).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.leaf_nodes, 1);
        assert_eq!(stats.internal_nodes, 0);
        assert_eq!(stats.max_depth, 0);

        tree.insert(Point::new(-10.0, -10.0, ()));
        tree.insert(Point::new(10.0, 10.0, ()));

        let stats = tree.stats();
        assert_eq!(stats.total_points, 2);
        assert_eq!(stats.internal_nodes, 1);
        assert_eq!(stats.leaf_nodes, 4);
        assert_eq!(stats.max_depth, 1);
    }
}
