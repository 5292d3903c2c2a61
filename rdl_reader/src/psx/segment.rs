use std::io::Read;
use bitfield::bitfield;
use byteorder::{ReadBytesExt, LE};
use nonmax::{NonMaxU16, NonMaxU8};
use rdl_model::{Connection, Level, OverlayRotation, Uvl, NUM_SEG_VERTS, NUM_SIDES, NUM_SIDE_VERTS};
use crate::{check_index, Readable, Result};

const CHILD_EXIT: i16 = -2;
const CHILD_SOLID: i16 = -1;
const NO_WALL: i16 = -1;
const NO_MATCEN: i8 = -1;
//console samples are byte precision, the target is 16.16 fixed-point
const UV_BIAS: i32 = 0x40;
const UV_SHIFT: u32 = 10;
const LIGHT_SHIFT: u32 = 9;
const SEG_LIGHT_SHIFT: u32 = 4;

bitfield! {
	pub struct OverlayDetails(u16);
	pub texture, _: 13, 0;
	pub rotation, _: 15, 14;
}

pub(crate) struct RawSegment {
	/// Indices into the raw side array.
	pub sides: [i16; NUM_SIDES],
	/// -2 = level exit, -1 = solid, otherwise index into `Level.segments`.
	pub children: [i16; NUM_SIDES],
	/// Indices into `Level.vertices`.
	pub vertices: [i16; NUM_SEG_VERTS],
	pub function: u8,
	/// Index into `Level.matcens`, -1 = none.
	pub matcen: i8,
	pub light: i16,
}

impl Readable for RawSegment {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		<[i16; NUM_SIDES]>::read(reader)?;//normal indices, normals are recomputed from final geometry
		let sides = <[i16; NUM_SIDES]>::read(reader)?;
		let children = <[i16; NUM_SIDES]>::read(reader)?;
		let vertices = <[i16; NUM_SEG_VERTS]>::read(reader)?;
		reader.read_i16::<LE>()?;//object list head, rebuilt by the game
		let function = reader.read_u8()?;
		let matcen = reader.read_i8()?;
		let light = reader.read_i16::<LE>()?;
		reader.read_u8()?;//function-specific value, unused by the graph
		<[u8; 2]>::read(reader)?;//pad
		Ok(RawSegment { sides, children, vertices, function, matcen, light })
	}
}

pub(crate) struct RawSide {
	/// Index into `Level.walls`, -1 = none.
	pub wall: i16,
	pub base_texture: u16,
	pub overlay: OverlayDetails,
	pub u: [i16; NUM_SIDE_VERTS],
	pub v: [i16; NUM_SIDE_VERTS],
	pub light: [u8; NUM_SIDE_VERTS],
}

impl Readable for RawSide {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(RawSide {
			wall: reader.read_i16::<LE>()?,
			base_texture: reader.read_u16::<LE>()?,
			overlay: OverlayDetails(reader.read_u16::<LE>()?),
			u: Readable::read(reader)?,
			v: Readable::read(reader)?,
			light: Readable::read(reader)?,
		})
	}
}

fn scale_uv(raw: i16) -> i32 {
	(raw as i32 - UV_BIAS) << UV_SHIFT
}

fn scale_light(raw: u8) -> i32 {
	(raw as i32) << LIGHT_SHIFT
}

/// Fills the pre-allocated segment/side skeleton from the flat raw arrays:
/// adjacency, wall references, unpacked and rescaled texture data, vertex
/// slots plus vertex back references, and the matcen link.
pub(crate) fn build_segments(
	level: &mut Level, raw_segments: &[RawSegment], raw_sides: &[RawSide],
) -> Result<()> {
	let num_segments = level.segments.len();
	let num_vertices = level.vertices.len();
	let num_walls = level.walls.len();
	let num_matcens = level.matcens.len();
	for (index, raw) in raw_segments.iter().enumerate() {
		for (slot, &vertex) in raw.vertices.iter().enumerate() {
			let vertex = check_index("vertex", vertex as i32, num_vertices)?;
			level.segments[index].vertices[slot] = vertex as u16;
			level.vertices[vertex].segments.push((index as u16, slot as u8));
		}
		for slot in 0..NUM_SIDES {
			let raw_side = &raw_sides[check_index("side", raw.sides[slot] as i32, raw_sides.len())?];
			let wall = match raw_side.wall {
				NO_WALL => None,
				wall => NonMaxU16::new(check_index("wall", wall as i32, num_walls)? as u16),
			};
			let side = &mut level.segments[index].sides[slot];
			side.connection = match raw.children[slot] {
				CHILD_EXIT => Connection::Exit,
				CHILD_SOLID => Connection::Solid,
				child => Connection::Segment(check_index("segment", child as i32, num_segments)? as u16),
			};
			side.wall = wall;
			side.base_texture = raw_side.base_texture;
			side.overlay_texture = raw_side.overlay.texture();
			side.overlay_rotation = OverlayRotation::from_bits(raw_side.overlay.rotation());
			for i in 0..NUM_SIDE_VERTS {
				side.uvls[i] = Uvl {
					u: scale_uv(raw_side.u[i]),
					v: scale_uv(raw_side.v[i]),
					l: scale_light(raw_side.light[i]),
				};
			}
		}
		let segment = &mut level.segments[index];
		segment.function = raw.function;
		segment.light = (raw.light as i32) << SEG_LIGHT_SHIFT;
		if raw.matcen != NO_MATCEN {
			//ancillary link: out-of-range indices are treated as absent
			if raw.matcen >= 0 && (raw.matcen as usize) < num_matcens {
				segment.matcen = NonMaxU8::new(raw.matcen as u8);
			}
		}
	}
	Ok(())
}
