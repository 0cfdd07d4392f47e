//! Multi-solid collision containers
//!
//! A container is `solid_count` solids, each prefixed by its byte size,
//! followed by a free-form key-values text block. A solid either starts
//! with the `VPHY` header (version, model type, drag areas) or is a bare
//! compact surface.

use crate::foundation::math::Vec3;

use super::ledge_tree::{LedgeTreeImporter, LegacySurface};
use super::{Endianness, LegacyFormatError, LegacyReader};

/// Identifier opening a solid with a modern header
pub const SOLID_HEADER_ID: u32 = u32::from_le_bytes(*b"VPHY");

/// Model type of a solid holding a compact surface
pub const MODEL_TYPE_COMPACT_SURFACE: i16 = 0;

/// Bytes from the `VPHY` id to the start of the compact surface
const MODERN_HEADER_SIZE: usize = 28;

/// One decoded solid
#[derive(Debug, Clone)]
pub struct LegacySolid {
    /// Header version, `None` for a bare compact surface
    pub version: Option<i16>,
    /// Silhouette areas per host axis, when the header carries them
    pub drag_axis_areas: Option<Vec3>,
    /// The compact surface itself
    pub surface: LegacySurface,
}

/// A decoded container
#[derive(Debug, Clone)]
pub struct VCollideData {
    /// Solids in file order
    pub solids: Vec<LegacySolid>,
    /// Trailing text block, empty when absent
    pub key_values: String,
}

/// Decode one solid; `reader` spans exactly the solid's bytes
pub fn parse_solid(
    reader: &LegacyReader<'_>,
    importer: &LedgeTreeImporter,
) -> Result<LegacySolid, LegacyFormatError> {
    if reader.len() >= 4 && reader.read_u32(0)? == SOLID_HEADER_ID {
        let version = reader.read_i16(4)?;
        let model_type = reader.read_i16(6)?;
        if model_type != MODEL_TYPE_COMPACT_SURFACE {
            return Err(LegacyFormatError::UnknownModelType(model_type));
        }
        let drag_axis_areas = Vec3::from(reader.read_f32x3(12)?);
        log::trace!("Solid header version {}, drag areas {:?}", version, drag_axis_areas);
        let surface = importer.import_surface(reader, MODERN_HEADER_SIZE)?;
        Ok(LegacySolid {
            version: Some(version),
            drag_axis_areas: Some(drag_axis_areas),
            surface,
        })
    } else {
        Ok(LegacySolid {
            version: None,
            drag_axis_areas: None,
            surface: importer.import_surface(reader, 0)?,
        })
    }
}

/// Decode a whole container
pub fn parse_vcollide(
    data: &[u8],
    solid_count: usize,
    order: Endianness,
    importer: &LedgeTreeImporter,
) -> Result<VCollideData, LegacyFormatError> {
    let reader = LegacyReader::new(data, order);
    // Every solid needs at least its size word.
    let mut solids = Vec::with_capacity(solid_count.min(data.len() / 4));
    let mut offset = 0usize;

    for _ in 0..solid_count {
        let size = reader.read_i32(offset)?;
        let size = usize::try_from(size).map_err(|_| LegacyFormatError::BadOffset {
            offset: offset as i64 + i64::from(size),
        })?;
        let solid = reader.slice(offset + 4, size)?;
        solids.push(parse_solid(&solid, importer)?);
        offset += 4 + size;
    }

    let tail = reader.tail(offset)?;
    let text = tail.bytes(0, tail.len())?;
    let text = text.split(|&byte| byte == 0).next().unwrap_or_default();
    let key_values = String::from_utf8_lossy(text).into_owned();

    log::debug!(
        "Parsed collision container: {} solids, {} bytes of key values",
        solids.len(),
        key_values.len()
    );
    Ok(VCollideData { solids, key_values })
}
