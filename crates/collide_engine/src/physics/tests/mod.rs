//! Cross-module tests for the collision facade
//!
//! Legacy buffers are assembled by hand with [`LegacyWriter`] so every test
//! controls the exact bytes, in either byte order.


use crate::core::CollisionConfig;
use crate::physics::legacy::records::{
    CompactLedge, CompactSurface, CompactTriangle, FloatPoint, LedgeTreeNode, COMPACT_SURFACE_ID,
};
use crate::physics::legacy::vcollide::SOLID_HEADER_ID;
use crate::physics::legacy::Endianness;
use crate::physics::CollisionFacade;

/// Unit tetrahedron in the legacy convention
pub(crate) const TETRA: [[f32; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

const TETRA_FACES: [[u32; 3]; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];

/// Bytes taken by one tetrahedron ledge including its points
const TETRA_LEDGE_SIZE: usize =
    CompactLedge::SIZE + TETRA_FACES.len() * CompactTriangle::SIZE + TETRA.len() * FloatPoint::SIZE;

/// Facade working directly in meters with no margin
pub(crate) fn meter_facade() -> CollisionFacade {
    CollisionFacade::new(CollisionConfig::new().with_meters_per_unit(1.0).with_convex_margin(0.0))
        .unwrap()
}

/// Translate every point of a tetrahedron
pub(crate) fn shifted(points: [[f32; 3]; 4], offset: [f32; 3]) -> [[f32; 3]; 4] {
    points.map(|p| [p[0] + offset[0], p[1] + offset[1], p[2] + offset[2]])
}

/// Writes legacy records in a chosen byte order
pub(crate) struct LegacyWriter {
    pub data: Vec<u8>,
    order: Endianness,
    /// Material written on each tetrahedron face, in face order
    face_materials: [u32; 4],
}

impl LegacyWriter {
    pub fn new(order: Endianness) -> Self {
        Self {
            data: Vec::new(),
            order,
            face_materials: [0; 4],
        }
    }

    /// Tag the faces of every following tetrahedron with 7-bit materials
    pub fn with_face_materials(mut self, materials: [u32; 4]) -> Self {
        self.face_materials = materials;
        self
    }

    pub fn u32(&mut self, value: u32) {
        match self.order {
            Endianness::Little => self.data.extend_from_slice(&value.to_le_bytes()),
            Endianness::Big => self.data.extend_from_slice(&value.to_be_bytes()),
        }
    }

    pub fn i32(&mut self, value: i32) {
        self.u32(value as u32);
    }

    pub fn i16(&mut self, value: i16) {
        match self.order {
            Endianness::Little => self.data.extend_from_slice(&value.to_le_bytes()),
            Endianness::Big => self.data.extend_from_slice(&value.to_be_bytes()),
        }
    }

    pub fn f32(&mut self, value: f32) {
        self.u32(value.to_bits());
    }

    pub fn f32x3(&mut self, values: [f32; 3]) {
        for value in values {
            self.f32(value);
        }
    }

    fn node(&mut self, right_offset: i32, ledge_offset: i32) {
        self.i32(right_offset);
        self.i32(ledge_offset);
        self.f32x3([0.0; 3]);
        self.f32(1.0);
        self.u32(0);
    }

    fn tetra_ledge(&mut self, client_data: i32, points: [[f32; 3]; 4]) {
        self.i32((CompactLedge::SIZE + TETRA_FACES.len() * CompactTriangle::SIZE) as i32);
        self.i32(client_data);
        self.u32(((TETRA_FACES.len() + points.len() + 1) as u32) << 8);
        self.i16(TETRA_FACES.len() as i16);
        self.i16(0);
        for (index, face) in TETRA_FACES.iter().enumerate() {
            self.u32(index as u32 | (self.face_materials[index] & 0x7f) << 24);
            for vertex in face {
                self.u32(*vertex);
            }
        }
        for point in points {
            self.f32x3(point);
            self.f32(0.0);
        }
    }

    /// Compact surface whose tree has one leaf per tetrahedron, left to right
    pub fn surface(&mut self, mass_center: [f32; 3], inertia: [f32; 3], ledges: &[(i32, [[f32; 3]; 4])]) {
        self.surface_with_id(mass_center, inertia, ledges, COMPACT_SURFACE_ID);
    }

    /// Compact surface with a chosen identifier word
    pub fn surface_with_id(
        &mut self,
        mass_center: [f32; 3],
        inertia: [f32; 3],
        ledges: &[(i32, [[f32; 3]; 4])],
        id: u32,
    ) {
        let node_count = 2 * ledges.len() - 1;
        let total = CompactSurface::SIZE + node_count * LedgeTreeNode::SIZE + ledges.len() * TETRA_LEDGE_SIZE;

        self.f32x3(mass_center);
        self.f32x3(inertia);
        self.f32(2.0);
        self.u32((total as u32) << 8);
        self.i32(CompactSurface::SIZE as i32);
        self.i32(0);
        self.i32(0);
        self.u32(id);

        // Right-leaning spine: internal nodes each hold one leaf on the left.
        let ledges_start = node_count * LedgeTreeNode::SIZE;
        for (index, _) in ledges.iter().enumerate() {
            let node_index = 2 * index;
            let ledge_at = ledges_start + index * TETRA_LEDGE_SIZE;
            if index + 1 < ledges.len() {
                self.node(2 * LedgeTreeNode::SIZE as i32, 0);
                let leaf_at = (node_index + 1) * LedgeTreeNode::SIZE;
                self.node(0, (ledge_at - leaf_at) as i32);
            } else {
                let leaf_at = node_index * LedgeTreeNode::SIZE;
                self.node(0, (ledge_at - leaf_at) as i32);
            }
        }
        for (client_data, points) in ledges {
            self.tetra_ledge(*client_data, *points);
        }
    }

    /// Modern solid header placed before a compact surface
    pub fn solid_header(&mut self, model_type: i16, drag_axis_areas: [f32; 3]) {
        self.u32(SOLID_HEADER_ID);
        self.i16(0x100);
        self.i16(model_type);
        self.i32(0);
        self.f32x3(drag_axis_areas);
        self.i32(0);
    }

    /// Append a size-prefixed solid
    pub fn sized_solid(&mut self, solid: &[u8]) {
        self.i32(solid.len() as i32);
        self.data.extend_from_slice(solid);
    }
}
