//! Reader for the console-format level stream.
//!
//! The stream is a fixed-layout record sequence with index-based references
//! between records, some of which point forward. Reading happens in the one
//! order the format allows: header, objects, walls, wall links, triggers,
//! wall-trigger links, reactor targets, matcens, vertices, raw segments, raw
//! sides, then the segment/side translation pass.

mod object;
mod segment;
mod wall;

use std::io::Read;
use byteorder::{ReadBytesExt, LE};
use glam::IVec3;
use rdl_model::{Level, Matcen, Segment, Vertex};
use crate::{check_index, read_vec, Readable, Result};

pub const LEVEL_NAME_LEN: usize = 36;

struct Header {
	name: String,
	num_objects: usize,
	num_walls: usize,
	num_triggers: usize,
	num_matcens: usize,
	num_vertices: usize,
	num_segments: usize,
	num_sides: usize,
}

fn count<R: Read>(reader: &mut R) -> Result<usize> {
	Ok(reader.read_i32::<LE>()?.max(0) as usize)
}

impl Readable for Header {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let name_bytes = <[u8; LEVEL_NAME_LEN]>::read(reader)?;
		let end = name_bytes.iter().position(|&b| b == 0).unwrap_or(LEVEL_NAME_LEN);
		let name = String::from_utf8_lossy(&name_bytes[..end]).into_owned();
		let num_objects = (reader.read_i32::<LE>()? + 1).max(0) as usize;//stored as count minus one
		let num_walls = count(reader)?;
		count(reader)?;//door count, doors are rebuilt from walls
		let num_triggers = count(reader)?;
		let num_matcens = count(reader)?;
		let num_vertices = count(reader)?;
		let num_segments = count(reader)?;
		let num_sides = count(reader)?;
		count(reader)?;//normal count, normals are recomputed from final geometry
		Ok(Header {
			name,
			num_objects,
			num_walls,
			num_triggers,
			num_matcens,
			num_vertices,
			num_segments,
			num_sides,
		})
	}
}

/// Reads a console-format level into the cross-linked level graph.
///
/// On any failure the read aborts with no partial result; a level is either
/// fully linked or not produced at all.
pub fn read_level<R: Read>(reader: &mut R) -> Result<Level> {
	let header = Header::read(reader)?;
	let mut level = Level {
		name: header.name,
		//segment/side/vertex indices are mutually referential within one data
		//region, so the skeleton is allocated before any of it is read
		segments: vec![Segment::default(); header.num_segments],
		..Level::default()
	};
	for _ in 0..header.num_objects {
		let object = object::read_object(reader, header.num_segments)?;
		level.objects.push(object);
	}
	let pending = wall::read_walls(reader, &mut level, header.num_walls)?;
	wall::resolve_wall_links(&mut level, &pending.linked)?;
	wall::read_triggers(reader, &mut level, header.num_triggers)?;
	wall::resolve_wall_triggers(&mut level, &pending.triggers)?;
	wall::read_reactor_targets(reader, &mut level)?;
	for _ in 0..header.num_matcens {
		let matcen = read_matcen(reader, header.num_segments)?;
		level.matcens.push(matcen);
	}
	for _ in 0..header.num_vertices {
		level.vertices.push(Vertex { pos: IVec3::read(reader)?, segments: Vec::new() });
	}
	let raw_segments = read_vec::<_, segment::RawSegment>(reader, header.num_segments)?;
	let raw_sides = read_vec::<_, segment::RawSide>(reader, header.num_sides)?;
	segment::build_segments(&mut level, &raw_segments, &raw_sides)?;
	Ok(level)
}

fn read_matcen<R: Read>(reader: &mut R, num_segments: usize) -> Result<Matcen> {
	let spawn_flags = reader.read_u32::<LE>()?;
	let hit_points = reader.read_i32::<LE>()?;
	let interval = reader.read_i32::<LE>()?;
	let segment = check_index("segment", reader.read_i16::<LE>()? as i32, num_segments)? as u16;
	reader.read_i16::<LE>()?;//fuel center index, unused
	let spawn_types = (0u8..32).filter(|&id| spawn_flags & (1u32 << id) != 0).collect();
	Ok(Matcen { segment, spawn_types, hit_points, interval })
}
