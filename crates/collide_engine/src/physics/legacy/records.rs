//! Fixed-layout legacy records
//!
//! Bitfields are packed least significant bit first. Each bitfield word is
//! read whole in the buffer's byte order and only then split into fields.

use super::{LegacyFormatError, LegacyReader};

/// Identifier stored in the last reserved word of a compact surface
pub const COMPACT_SURFACE_ID: u32 = u32::from_le_bytes(*b"IVPS");

/// A ledge point: position plus a precomputed plane value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatPoint {
    /// Coordinates in the legacy convention
    pub k: [f32; 3],
    /// Unused by the importer
    pub hesse: f32,
}

impl FloatPoint {
    /// Record size in bytes
    pub const SIZE: usize = 16;

    /// Decode the record at `offset`
    pub fn read(reader: &LegacyReader<'_>, offset: usize) -> Result<Self, LegacyFormatError> {
        reader.bytes(offset, Self::SIZE)?;
        Ok(Self {
            k: reader.read_f32x3(offset)?,
            hesse: reader.read_f32(offset + 12)?,
        })
    }
}

/// One half-edge of a compact triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactEdge {
    /// Index of the edge's first point within the ledge
    pub start_point_index: u16,
    /// Relative index of the opposite half-edge
    pub opposite_index: i16,
    /// Edge was added by the decomposition and is not a real feature
    pub is_virtual: bool,
}

impl CompactEdge {
    /// Record size in bytes
    pub const SIZE: usize = 4;

    /// Split a corrected bitfield word: 16 bits start, 15 bits signed opposite, 1 bit virtual
    pub fn from_word(word: u32) -> Self {
        Self {
            start_point_index: (word & 0xffff) as u16,
            opposite_index: (((word << 1) as i32) >> 17) as i16,
            is_virtual: word >> 31 != 0,
        }
    }

    /// Decode the record at `offset`
    pub fn read(reader: &LegacyReader<'_>, offset: usize) -> Result<Self, LegacyFormatError> {
        Ok(Self::from_word(reader.read_u32(offset)?))
    }
}

/// A ledge triangle with its three edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactTriangle {
    /// Triangle index within the ledge (12 bits)
    pub tri_index: u16,
    /// Index of the triangle opposite this one (12 bits)
    pub pierce_index: u16,
    /// Surface material, 0 for none (7 bits)
    pub material_index: u8,
    /// Triangle was added by the decomposition
    pub is_virtual: bool,
    /// Edges in winding order
    pub edges: [CompactEdge; 3],
}

impl CompactTriangle {
    /// Record size in bytes
    pub const SIZE: usize = 16;

    /// Decode the record at `offset`
    pub fn read(reader: &LegacyReader<'_>, offset: usize) -> Result<Self, LegacyFormatError> {
        reader.bytes(offset, Self::SIZE)?;
        let word = reader.read_u32(offset)?;
        Ok(Self {
            tri_index: (word & 0xfff) as u16,
            pierce_index: ((word >> 12) & 0xfff) as u16,
            material_index: ((word >> 24) & 0x7f) as u8,
            is_virtual: word >> 31 != 0,
            edges: [
                CompactEdge::read(reader, offset + 4)?,
                CompactEdge::read(reader, offset + 8)?,
                CompactEdge::read(reader, offset + 12)?,
            ],
        })
    }

    /// Start points of the three edges, the triangle's vertex indices
    pub fn vertex_indices(&self) -> [u32; 3] {
        self.edges.map(|edge| u32::from(edge.start_point_index))
    }
}

/// Header of one convex piece; its triangles follow immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactLedge {
    /// Offset of the point array, relative to the ledge
    pub point_offset: i32,
    /// User value attached by the authoring tool
    pub client_data: i32,
    /// 2-bit flag
    pub has_children: u8,
    /// 2-bit flag
    pub is_compact: u8,
    /// Record size in 16-byte units, triangles and point count included
    pub size_div_16: u32,
    /// Number of triangles following the header
    pub n_triangles: i16,
    /// Reserved
    pub for_future_use: i16,
}

impl CompactLedge {
    /// Record size in bytes
    pub const SIZE: usize = 16;

    /// Decode the record at `offset`
    pub fn read(reader: &LegacyReader<'_>, offset: usize) -> Result<Self, LegacyFormatError> {
        reader.bytes(offset, Self::SIZE)?;
        let word = reader.read_u32(offset + 8)?;
        Ok(Self {
            point_offset: reader.read_i32(offset)?,
            client_data: reader.read_i32(offset + 4)?,
            has_children: (word & 0x3) as u8,
            is_compact: ((word >> 2) & 0x3) as u8,
            size_div_16: word >> 8,
            n_triangles: reader.read_i16(offset + 12)?,
            for_future_use: reader.read_i16(offset + 14)?,
        })
    }

    /// Points owned by the ledge; may be negative for a malformed record
    pub fn point_count(&self) -> i64 {
        i64::from(self.size_div_16) - i64::from(self.n_triangles) - 1
    }

    /// Offset of triangle `index` relative to the ledge
    pub fn triangle_offset(index: usize) -> usize {
        Self::SIZE + index * CompactTriangle::SIZE
    }
}

/// A node of the ledge tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgeTreeNode {
    /// Offset of the right child relative to this node, 0 for a leaf
    pub offset_right_node: i32,
    /// Offset of the leaf's ledge relative to this node
    pub offset_compact_ledge: i32,
    /// Bounding sphere center
    pub center: [f32; 3],
    /// Bounding sphere radius
    pub radius: f32,
    /// Quantized box extents
    pub box_sizes: [u8; 3],
}

impl LedgeTreeNode {
    /// Record size in bytes
    pub const SIZE: usize = 28;

    /// Decode the record at `offset`
    pub fn read(reader: &LegacyReader<'_>, offset: usize) -> Result<Self, LegacyFormatError> {
        reader.bytes(offset, Self::SIZE)?;
        Ok(Self {
            offset_right_node: reader.read_i32(offset)?,
            offset_compact_ledge: reader.read_i32(offset + 4)?,
            center: reader.read_f32x3(offset + 8)?,
            radius: reader.read_f32(offset + 20)?,
            box_sizes: [
                reader.read_u8(offset + 24)?,
                reader.read_u8(offset + 25)?,
                reader.read_u8(offset + 26)?,
            ],
        })
    }

    /// Leaves carry a ledge; internal nodes carry two children
    pub fn is_leaf(&self) -> bool {
        self.offset_right_node == 0
    }
}

/// Header of a compact surface, the root of one legacy solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactSurface {
    /// Center of mass in the legacy convention
    pub mass_center: [f32; 3],
    /// Principal inertia
    pub rotation_inertia: [f32; 3],
    /// Radius of a sphere enclosing the surface
    pub upper_limit_radius: f32,
    /// 8-bit quality factor
    pub max_factor_surface_deviation: u8,
    /// Surface size in bytes (signed 24 bits)
    pub byte_size: i32,
    /// Offset of the ledge tree root relative to the surface
    pub offset_ledgetree_root: i32,
    /// Reserved words; the last holds [`COMPACT_SURFACE_ID`]
    pub dummy: [i32; 3],
}

impl CompactSurface {
    /// Record size in bytes
    pub const SIZE: usize = 48;

    /// Decode the record at `offset`
    pub fn read(reader: &LegacyReader<'_>, offset: usize) -> Result<Self, LegacyFormatError> {
        reader.bytes(offset, Self::SIZE)?;
        let word = reader.read_u32(offset + 28)?;
        Ok(Self {
            mass_center: reader.read_f32x3(offset)?,
            rotation_inertia: reader.read_f32x3(offset + 12)?,
            upper_limit_radius: reader.read_f32(offset + 24)?,
            max_factor_surface_deviation: (word & 0xff) as u8,
            byte_size: (word as i32) >> 8,
            offset_ledgetree_root: reader.read_i32(offset + 32)?,
            dummy: [
                reader.read_i32(offset + 36)?,
                reader.read_i32(offset + 40)?,
                reader.read_i32(offset + 44)?,
            ],
        })
    }

    /// The identifier word
    pub fn id(&self) -> u32 {
        self.dummy[2] as u32
    }
}
