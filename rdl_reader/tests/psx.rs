use std::io::Cursor;
use glam::IVec3;
use nonmax::{NonMaxU16, NonMaxU8};
use rdl_model::object::{Control, Movement, Render};
use rdl_model::{Connection, OverlayRotation, SideId, NUM_REACTOR_TARGETS, NUM_TRIGGER_TARGETS};
use rdl_reader::{psx::read_level, ReadError};

/// Little-endian byte stream builder for synthetic levels.
#[derive(Default)]
struct Stream(Vec<u8>);

impl Stream {
	fn u8(&mut self, v: u8) -> &mut Self {
		self.0.push(v);
		self
	}

	fn i8(&mut self, v: i8) -> &mut Self {
		self.0.push(v as u8);
		self
	}

	fn u16(&mut self, v: u16) -> &mut Self {
		self.0.extend_from_slice(&v.to_le_bytes());
		self
	}

	fn i16(&mut self, v: i16) -> &mut Self {
		self.0.extend_from_slice(&v.to_le_bytes());
		self
	}

	fn i32(&mut self, v: i32) -> &mut Self {
		self.0.extend_from_slice(&v.to_le_bytes());
		self
	}

	fn u32(&mut self, v: u32) -> &mut Self {
		self.0.extend_from_slice(&v.to_le_bytes());
		self
	}

	fn zeros(&mut self, n: usize) -> &mut Self {
		self.0.extend(std::iter::repeat(0).take(n));
		self
	}

	fn vec(&mut self, x: i32, y: i32, z: i32) -> &mut Self {
		self.i32(x).i32(y).i32(z)
	}

	fn header(&mut self, name: &[u8], counts: [i32; 9]) -> &mut Self {
		let mut field = [0; 36];
		field[..name.len()].copy_from_slice(name);
		self.0.extend_from_slice(&field);
		for count in counts {
			self.i32(count);
		}
		self
	}

	/// Object with common fields and all-none variant slots unless the caller
	/// overwrites the tag bytes afterwards.
	fn none_object(&mut self, segment: i16) -> &mut Self {
		self.u8(0).u8(0);//kind, id
		self.u8(0).u8(0).u8(0);//control, movement, render tags
		self.u8(0);//flags
		self.i16(segment);
		self.vec(1 << 16, 2 << 16, 3 << 16);//pos
		self.vec(1 << 16, 0, 0).vec(0, 1 << 16, 0).vec(0, 0, 1 << 16);//orient
		self.i32(4 << 16);//size
		self.i32(100 << 16);//shields
		self.vec(1 << 16, 2 << 16, 3 << 16);//last pos
		self.u8(0).u8(0).u8(0);//contains
		self.zeros(64 + 32 + 76)
	}

	fn wall(&mut self, segment: i32, side: i32, linked: i32, trigger: u8) -> &mut Self {
		self.i32(segment).i32(side);
		self.i32(100 << 16);//hit points
		self.i32(linked);
		self.u8(2);//kind
		self.u8(0).u8(0);//flags, state
		self.u8(trigger);
		self.u8(0).u8(0);//clip, keys
		self.u8(0xFF);//cloak, none
		self.u8(0)//pad
	}

	fn trigger(&mut self, num_links: i16, targets: &[(i16, i16)]) -> &mut Self {
		self.u8(1);//kind
		self.u16(0);//flags
		self.i32(5 << 16);//value
		self.i32(-1);//time
		self.i16(num_links);
		for i in 0..NUM_TRIGGER_TARGETS {
			self.i16(targets.get(i).map_or(0, |t| t.0));
		}
		for i in 0..NUM_TRIGGER_TARGETS {
			self.i16(targets.get(i).map_or(0, |t| t.1));
		}
		self
	}

	fn reactor_targets(&mut self, targets: &[(i16, i16)]) -> &mut Self {
		self.u16(targets.len() as u16);
		for i in 0..NUM_REACTOR_TARGETS {
			self.i16(targets.get(i).map_or(0, |t| t.0));
		}
		for i in 0..NUM_REACTOR_TARGETS {
			self.i16(targets.get(i).map_or(0, |t| t.1));
		}
		self
	}

	fn raw_segment(
		&mut self, sides: [i16; 6], children: [i16; 6], verts: [i16; 8], matcen: i8, light: i16,
	) -> &mut Self {
		for _ in 0..6 {
			self.i16(0);//normal indices
		}
		for v in sides {
			self.i16(v);
		}
		for v in children {
			self.i16(v);
		}
		for v in verts {
			self.i16(v);
		}
		self.i16(-1);//object list head
		self.u8(0);//function
		self.i8(matcen);
		self.i16(light);
		self.u8(0);//value
		self.zeros(2)
	}

	fn raw_side(&mut self, wall: i16, base: u16, overlay: u16, u: i16, v: i16, light: u8) -> &mut Self {
		self.i16(wall).u16(base).u16(overlay);
		for _ in 0..4 {
			self.i16(u);
		}
		for _ in 0..4 {
			self.i16(v);
		}
		for _ in 0..4 {
			self.u8(light);
		}
		self
	}
}

fn minimal_level() -> Vec<u8> {
	let mut s = Stream::default();
	s.header(b"SYNTH", [0, 0, 0, 0, 0, 8, 1, 6, 0]);
	s.none_object(0);
	s.reactor_targets(&[]);
	for i in 0..8 {
		s.vec(i << 16, 0, 0);
	}
	s.raw_segment([0, 1, 2, 3, 4, 5], [-1; 6], [0, 1, 2, 3, 4, 5, 6, 7], -1, 0);
	for _ in 0..6 {
		s.raw_side(-1, 1, 0, 0x40, 0x40, 0);
	}
	s.0
}

#[test]
fn minimal_level_round_trip() {
	let bytes = minimal_level();
	let len = bytes.len() as u64;
	let mut reader = Cursor::new(bytes);
	let level = read_level(&mut reader).unwrap();
	assert_eq!(reader.position(), len, "stream not fully consumed");
	assert_eq!(level.name, "SYNTH");
	assert_eq!(level.segments.len(), 1);
	assert_eq!(level.vertices.len(), 8);
	assert!(level.walls.is_empty());
	assert!(level.triggers.is_empty());
	assert!(level.matcens.is_empty());
	assert!(level.reactor_targets.is_empty());
	for (index, vertex) in level.vertices.iter().enumerate() {
		assert_eq!(vertex.pos, IVec3::new((index as i32) << 16, 0, 0));
		assert_eq!(vertex.segments, [(0, index as u8)]);
	}
	for side in &level.segments[0].sides {
		assert_eq!(side.connection, Connection::Solid);
		assert_eq!(side.wall, None);
		for uvl in side.uvls {
			assert_eq!((uvl.u, uvl.v, uvl.l), (0, 0, 0));
		}
	}
	assert_eq!(level.objects.len(), 1);
	let object = &level.objects[0];
	assert_eq!(object.movement, Movement::None);
	assert_eq!(object.control, Control::None);
	assert_eq!(object.render, Render::None);
	assert_eq!(object.pos, IVec3::new(1 << 16, 2 << 16, 3 << 16));
	assert_eq!(object.orient.up, IVec3::new(0, 1 << 16, 0));
}

fn cross_linked_level() -> Vec<u8> {
	let mut s = Stream::default();
	s.header(b"CROSSLINK", [0, 2, 0, 1, 1, 16, 2, 12, 0]);
	//object with physics movement, ai control, polyobj render
	s.u8(3).u8(0);//kind, id
	s.u8(1).u8(1).u8(1);//ai, physics, polyobj
	s.u8(0);//flags
	s.i16(1);//segment
	s.vec(0, 0, 0);//pos
	s.vec(1 << 16, 0, 0).vec(0, 1 << 16, 0).vec(0, 0, 1 << 16);
	s.i32(4 << 16).i32(100 << 16);
	s.vec(0, 0, 0);
	s.u8(0).u8(0).u8(0);
	//physics slot, exactly 64 bytes
	s.vec(1 << 16, 2 << 16, 3 << 16);//velocity
	s.zeros(12);//thrust
	s.i32(10 << 16).i32(0x100).i32(0);//mass, drag, brakes
	s.zeros(24);//rot velocity, rot thrust
	s.i16(3).u16(1);//turn roll, flags
	//ai slot, 20 bytes of fields + 12 discard
	s.u8(0x42);
	for flag in 1..=11 {
		s.u8(flag);
	}
	s.i16(1).i16(2).i16(3).i16(4);
	s.zeros(12);
	//polyobj slot, 72 bytes of fields + 4 discard
	s.i32(5);
	s.zeros(60);//anim angles
	s.i32(0x3F).i32(-1);
	s.zeros(4);
	//walls: only wall 0 stores the link and the trigger
	s.wall(0, 2, 1, 0);
	s.wall(1, 0, -1, 0xFF);
	s.trigger(1, &[(0, 2)]);
	s.reactor_targets(&[(1, 5)]);
	//matcen in segment 1
	s.u32(0b101).i32(500 << 16).i32(5 << 16).i16(1).i16(0);
	for i in 0..16 {
		s.vec(i << 16, 0, 0);
	}
	s.raw_segment([0, 1, 2, 3, 4, 5], [-1, -1, 1, -1, -1, -1], [0, 1, 2, 3, 4, 5, 6, 7], -1, 0x10);
	s.raw_segment(
		[6, 7, 8, 9, 10, 11],
		[0, -1, -1, -1, -1, -2],
		[8, 9, 10, 11, 12, 13, 14, 15],
		0,
		0,
	);
	for i in 0..12 {
		match i {
			2 => s.raw_side(0, 7, 0x8005, 0x41, 0x3F, 1),
			6 => s.raw_side(1, 7, 0, 0x40, 0x40, 0),
			_ => s.raw_side(-1, 1, 0, 0x40, 0x40, 0),
		};
	}
	s.0
}

#[test]
fn cross_linked_level_resolves() {
	let bytes = cross_linked_level();
	let len = bytes.len() as u64;
	let mut reader = Cursor::new(bytes);
	let level = read_level(&mut reader).unwrap();
	assert_eq!(reader.position(), len, "stream not fully consumed");

	//wall linkage is mutual even though only wall 0 stored it
	assert_eq!(level.walls[0].linked_wall, NonMaxU16::new(1));
	assert_eq!(level.walls[1].linked_wall, NonMaxU16::new(0));

	//wall-trigger cross references
	assert_eq!(level.walls[0].trigger, NonMaxU8::new(0));
	assert_eq!(level.walls[1].trigger, None);
	assert_eq!(level.triggers[0].walls, [0]);
	assert_eq!(level.triggers[0].targets, [SideId { segment: 0, side: 2 }]);
	assert_eq!(level.walls[0].controlling_triggers, [(0, 0)]);

	//adjacency
	let seg0 = &level.segments[0];
	let seg1 = &level.segments[1];
	assert_eq!(seg0.sides[2].connection, Connection::Segment(1));
	assert_eq!(seg0.sides[0].connection, Connection::Solid);
	assert_eq!(seg1.sides[0].connection, Connection::Segment(0));
	assert_eq!(seg1.sides[5].connection, Connection::Exit);

	//side-wall references
	assert_eq!(seg0.sides[2].wall, NonMaxU16::new(0));
	assert_eq!(seg1.sides[0].wall, NonMaxU16::new(1));
	assert_eq!(seg0.sides[3].wall, None);

	//texture unpack and rescale
	let side = &seg0.sides[2];
	assert_eq!(side.base_texture, 7);
	assert_eq!(side.overlay_texture, 5);
	assert_eq!(side.overlay_rotation, OverlayRotation::Rotate180);
	assert_eq!(side.uvls[0].u, 1 << 10);
	assert_eq!(side.uvls[0].v, -(1 << 10));
	assert_eq!(side.uvls[0].l, 1 << 9);
	assert_eq!(seg0.light, 0x10 << 4);
	assert_eq!(level.side(SideId { segment: 0, side: 2 }).base_texture, 7);

	//side 1 is bounded by vertex slots 0, 4, 7, 3
	assert_eq!(seg1.side_vertices(1), [8, 12, 15, 11]);

	//reactor targets
	assert_eq!(level.reactor_targets, [SideId { segment: 1, side: 5 }]);

	//matcen: segment 1 links to it, segment 0 has none
	assert_eq!(level.matcens[0].segment, 1);
	assert_eq!(level.matcens[0].spawn_types, [0, 2]);
	assert!(seg1.matcen.is_some());
	assert_eq!(seg0.matcen, None);

	//vertex back references span both segments
	assert_eq!(level.vertices[0].segments, [(0, 0)]);
	assert_eq!(level.vertices[8].segments, [(1, 0)]);

	//object variants
	let object = &level.objects[0];
	assert_eq!(object.segment, 1);
	let Movement::Physics(physics) = object.movement else {
		panic!("expected physics movement");
	};
	assert_eq!(physics.velocity, IVec3::new(1 << 16, 2 << 16, 3 << 16));
	assert_eq!(physics.turn_roll, 3);
	let Control::Ai(ai) = object.control else {
		panic!("expected ai control");
	};
	assert_eq!(ai.behavior, 0x42);
	assert_eq!(ai.flags, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
	assert_eq!(ai.cur_path_index, 4);
	let Render::Polyobj(polyobj) = object.render else {
		panic!("expected polyobj render");
	};
	assert_eq!(polyobj.model, 5);
	assert_eq!(polyobj.subobj_flags, 0x3F);
	assert_eq!(polyobj.texture_override, -1);
}

#[test]
fn truncated_stream_is_fatal() {
	let bytes = minimal_level();
	let cut = bytes.len() / 2;
	let result = read_level(&mut Cursor::new(&bytes[..cut]));
	assert!(matches!(result, Err(ReadError::Io(_))));
}

#[test]
fn bad_vertex_index_is_fatal() {
	let mut s = Stream::default();
	s.header(b"BAD", [-1, 0, 0, 0, 0, 8, 1, 6, 0]);
	s.reactor_targets(&[]);
	for i in 0..8 {
		s.vec(i << 16, 0, 0);
	}
	s.raw_segment([0, 1, 2, 3, 4, 5], [-1; 6], [0, 1, 2, 3, 4, 5, 6, 99], -1, 0);
	for _ in 0..6 {
		s.raw_side(-1, 1, 0, 0x40, 0x40, 0);
	}
	let result = read_level(&mut Cursor::new(s.0));
	assert!(matches!(
		result,
		Err(ReadError::BadIndex { kind: "vertex", index: 99, len: 8 })
	));
}

#[test]
fn wall_on_missing_segment_is_fatal() {
	let mut s = Stream::default();
	s.header(b"BAD", [-1, 1, 0, 0, 0, 8, 1, 6, 0]);
	s.wall(9, 0, -1, 0xFF);
	let result = read_level(&mut Cursor::new(s.0));
	assert!(matches!(
		result,
		Err(ReadError::BadIndex { kind: "segment", index: 9, len: 1 })
	));
}
