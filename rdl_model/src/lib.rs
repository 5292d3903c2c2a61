pub mod object;

use glam::IVec3;
use nonmax::{NonMaxU16, NonMaxU8};

pub const NUM_SIDES: usize = 6;
pub const NUM_SEG_VERTS: usize = 8;
pub const NUM_SIDE_VERTS: usize = 4;
pub const NUM_TRIGGER_TARGETS: usize = 10;
pub const NUM_REACTOR_TARGETS: usize = 20;

/// Vertex slots bounding each of a segment's 6 sides, wound facing outward.
pub const SIDE_VERT_IDS: [[usize; NUM_SIDE_VERTS]; NUM_SIDES] = [
	[7, 6, 2, 3],//left
	[0, 4, 7, 3],//top
	[0, 1, 5, 4],//right
	[2, 6, 5, 1],//bottom
	[4, 5, 6, 7],//back
	[3, 2, 1, 0],//front
];

pub mod seg_function {
	pub const NONE: u8 = 0;
	pub const FUELCEN: u8 = 1;
	pub const REPAIRCEN: u8 = 2;
	pub const CONTROLCEN: u8 = 3;
	pub const MATCEN: u8 = 4;
}

/// Row vectors are 16.16 fixed-point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Matrix {
	pub right: IVec3,
	pub up: IVec3,
	pub forward: IVec3,
}

#[derive(Clone, Debug, Default)]
pub struct Vertex {
	/// 16.16 fixed-point world coords.
	pub pos: IVec3,
	/// (index into `Level.segments`, vertex slot 0-7) pairs this vertex appears in.
	pub segments: Vec<(u16, u8)>,
}

/// A (segment, side slot) pair naming one side in the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideId {
	/// Index into `Level.segments`.
	pub segment: u16,
	/// Side slot 0-5.
	pub side: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connection {
	/// Index into `Level.segments`.
	Segment(u16),
	/// Exterior boundary, no neighboring segment.
	Exit,
	#[default]
	Solid,
}

/// Overlay texture rotation, in 90-degree steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayRotation {
	#[default]
	Rotate0,
	Rotate90,
	Rotate180,
	Rotate270,
}

impl OverlayRotation {
	pub fn from_bits(bits: u16) -> Self {
		match bits & 3 {
			0 => Self::Rotate0,
			1 => Self::Rotate90,
			2 => Self::Rotate180,
			_ => Self::Rotate270,
		}
	}
}

/// Per-vertex texture sample, 16.16 fixed-point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Uvl {
	pub u: i32,
	pub v: i32,
	pub l: i32,
}

#[derive(Clone, Debug, Default)]
pub struct Side {
	pub connection: Connection,
	/// Index into `Level.walls`.
	pub wall: Option<NonMaxU16>,
	pub base_texture: u16,
	pub overlay_texture: u16,
	pub overlay_rotation: OverlayRotation,
	pub uvls: [Uvl; NUM_SIDE_VERTS],
}

#[derive(Clone, Debug, Default)]
pub struct Segment {
	pub sides: [Side; NUM_SIDES],
	/// Indices into `Level.vertices`.
	pub vertices: [u16; NUM_SEG_VERTS],
	/// One of the values in the `seg_function` module.
	pub function: u8,
	/// Index into `Level.matcens`.
	pub matcen: Option<NonMaxU8>,
	/// 16.16 fixed-point.
	pub light: i32,
}

impl Segment {
	/// The 4 vertex indices bounding `side`, taken from this segment's vertex slots.
	pub fn side_vertices(&self, side: usize) -> [u16; NUM_SIDE_VERTS] {
		SIDE_VERT_IDS[side].map(|slot| self.vertices[slot])
	}
}

#[derive(Clone, Debug)]
pub struct Wall {
	/// Index into `Level.segments`.
	pub segment: u16,
	/// Side slot 0-5 on `segment`.
	pub side: u8,
	/// 16.16 fixed-point.
	pub hit_points: i32,
	pub kind: u8,
	pub flags: u8,
	pub state: u8,
	pub clip: u8,
	pub keys: u8,
	/// Opacity of cloaked walls.
	pub cloak: Option<NonMaxU8>,
	/// Index into `Level.walls`, always mutual with the target wall.
	pub linked_wall: Option<NonMaxU16>,
	/// Index into `Level.triggers`.
	pub trigger: Option<NonMaxU8>,
	/// (index into `Level.triggers`, position in that trigger's target list).
	pub controlling_triggers: Vec<(u8, u8)>,
}

#[derive(Clone, Debug)]
pub struct Trigger {
	pub kind: u8,
	pub flags: u16,
	/// 16.16 fixed-point.
	pub value: i32,
	/// 16.16 fixed-point.
	pub time: i32,
	/// Target sides, truncated to the record's logical count.
	pub targets: Vec<SideId>,
	/// Indices into `Level.walls` of walls this trigger operates.
	pub walls: Vec<u16>,
}

#[derive(Clone, Debug)]
pub struct Matcen {
	/// Index into `Level.segments`.
	pub segment: u16,
	/// Spawnable type ids 0-31, unpacked from the record's bitmask.
	pub spawn_types: Vec<u8>,
	/// 16.16 fixed-point.
	pub hit_points: i32,
	/// 16.16 fixed-point.
	pub interval: i32,
}

#[derive(Clone, Debug, Default)]
pub struct Level {
	pub name: String,
	pub vertices: Vec<Vertex>,
	pub segments: Vec<Segment>,
	pub objects: Vec<object::Object>,
	pub walls: Vec<Wall>,
	pub triggers: Vec<Trigger>,
	pub matcens: Vec<Matcen>,
	/// Sides opened when the reactor is destroyed, at most `NUM_REACTOR_TARGETS`.
	pub reactor_targets: Vec<SideId>,
}

impl Level {
	pub fn side(&self, id: SideId) -> &Side {
		&self.segments[id.segment as usize].sides[id.side as usize]
	}
}
