//! Ledge tree import
//!
//! Walks the binary ledge tree of a compact surface and turns every leaf
//! ledge into a hull convex. Traversal visits the left child (stored right
//! after its parent) before the right child, so convexes come out in the
//! order the authoring tool wrote them.

use crate::core::CollisionConfig;
use crate::foundation::math::Vec3;
use crate::physics::convex::{ConvexShape, HullShape};

use super::records::{
    CompactLedge, CompactSurface, CompactTriangle, FloatPoint, LedgeTreeNode, COMPACT_SURFACE_ID,
};
use super::{LegacyFormatError, LegacyReader};

/// Convert a legacy position to the physics convention
pub fn legacy_to_physics(k: [f32; 3]) -> Vec3 {
    Vec3::new(k[0], -k[1], -k[2])
}

/// Everything one compact surface contributes to a compound
#[derive(Debug, Clone)]
pub struct LegacySurface {
    /// Mass center authored offline, physics convention
    pub mass_center: Vec3,
    /// Principal inertia authored offline
    pub inertia: Vec3,
    /// One hull per leaf ledge, in tree order
    pub convexes: Vec<ConvexShape>,
}

/// Bounded walker over ledge trees
#[derive(Debug, Clone, Copy)]
pub struct LedgeTreeImporter {
    max_depth: usize,
    max_nodes: usize,
}

impl LedgeTreeImporter {
    /// Create an importer with explicit bounds
    pub fn new(max_depth: usize, max_nodes: usize) -> Self {
        Self { max_depth, max_nodes }
    }

    /// Create an importer with the bounds from a collision config
    pub fn from_config(config: &CollisionConfig) -> Self {
        Self::new(config.max_ledge_tree_depth, config.max_ledge_tree_nodes)
    }

    /// Import the compact surface starting at `offset`
    pub fn import_surface(
        &self,
        reader: &LegacyReader<'_>,
        offset: usize,
    ) -> Result<LegacySurface, LegacyFormatError> {
        let surface = CompactSurface::read(reader, offset)?;
        if surface.id() != COMPACT_SURFACE_ID {
            return Err(LegacyFormatError::UnsupportedCompactSurface(surface.id()));
        }
        let root = reader.resolve(offset, surface.offset_ledgetree_root)?;
        let convexes = self.import_tree(reader, root)?;
        log::debug!(
            "Imported compact surface at {} with {} ledges",
            offset,
            convexes.len()
        );
        Ok(LegacySurface {
            mass_center: legacy_to_physics(surface.mass_center),
            inertia: Vec3::from(surface.rotation_inertia).map(f32::abs),
            convexes,
        })
    }

    /// Import every leaf ledge below the node at `root`
    pub fn import_tree(
        &self,
        reader: &LegacyReader<'_>,
        root: usize,
    ) -> Result<Vec<ConvexShape>, LegacyFormatError> {
        let mut convexes = Vec::new();
        let mut stack = vec![(root, 0usize)];
        let mut visited = 0usize;

        while let Some((offset, depth)) = stack.pop() {
            visited += 1;
            if visited > self.max_nodes {
                return Err(LegacyFormatError::TooManyNodes { limit: self.max_nodes });
            }
            if depth > self.max_depth {
                return Err(LegacyFormatError::TreeTooDeep { depth: self.max_depth });
            }

            let node = LedgeTreeNode::read(reader, offset)?;
            if node.is_leaf() {
                let ledge = reader.resolve(offset, node.offset_compact_ledge)?;
                convexes.push(hull_from_ledge(reader, ledge)?);
            } else {
                // Right is pushed first so the left subtree is finished first.
                stack.push((reader.resolve(offset, node.offset_right_node)?, depth + 1));
                stack.push((offset + LedgeTreeNode::SIZE, depth + 1));
            }
        }

        log::trace!("Ledge tree at {} has {} nodes", root, visited);
        Ok(convexes)
    }
}

impl Default for LedgeTreeImporter {
    fn default() -> Self {
        Self::from_config(&CollisionConfig::default())
    }
}

/// Decode the ledge at `offset` into a hull convex.
///
/// Points are flipped into the physics convention, each triangle's vertex
/// indices are its edges' start points, and the ledge's client data becomes
/// the convex's game data.
pub fn hull_from_ledge(
    reader: &LegacyReader<'_>,
    offset: usize,
) -> Result<ConvexShape, LegacyFormatError> {
    let ledge = CompactLedge::read(reader, offset)?;
    let point_count = ledge.point_count();
    if point_count < 3 || ledge.n_triangles <= 0 {
        return Err(LegacyFormatError::InvalidLedge { offset });
    }
    let point_count = point_count as usize;
    let triangle_count = ledge.n_triangles as usize;

    let points_start = reader.resolve(offset, ledge.point_offset)?;
    let points = (0..point_count)
        .map(|index| {
            FloatPoint::read(reader, points_start + index * FloatPoint::SIZE)
                .map(|point| legacy_to_physics(point.k))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let triangles = (0..triangle_count)
        .map(|index| CompactTriangle::read(reader, offset + CompactLedge::triangle_offset(index)))
        .collect::<Result<Vec<_>, _>>()?;

    let indices = triangles.iter().map(CompactTriangle::vertex_indices).collect();
    let mut hull =
        HullShape::new(points, indices).ok_or(LegacyFormatError::InvalidLedge { offset })?;
    for (index, triangle) in triangles.iter().enumerate() {
        if triangle.material_index > 0 {
            hull.set_triangle_material(index, triangle.material_index);
        }
    }

    Ok(ConvexShape::hull(hull).with_game_data(ledge.client_data as u32))
}
