use glam::{I16Vec3, IVec3};
use crate::Matrix;

pub const NUM_AI_FLAGS: usize = 11;
pub const MAX_SUBMODELS: usize = 10;

pub mod movement_type {
	pub const NONE: u8 = 0;
	pub const PHYSICS: u8 = 1;
	pub const SPINNING: u8 = 3;
}

pub mod control_type {
	pub const NONE: u8 = 0;
	pub const AI: u8 = 1;
	pub const EXPLOSION: u8 = 2;
	pub const WEAPON: u8 = 9;
	pub const POWERUP: u8 = 13;
	pub const LIGHT: u8 = 14;
}

pub mod render_type {
	pub const NONE: u8 = 0;
	pub const POLYOBJ: u8 = 1;
	pub const FIREBALL: u8 = 2;
	pub const HOSTAGE: u8 = 4;
	pub const POWERUP: u8 = 5;
	pub const MORPH: u8 = 6;
	pub const WEAPON_VCLIP: u8 = 7;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhysicsInfo {
	/// 16.16 fixed-point.
	pub velocity: IVec3,
	pub thrust: IVec3,
	pub mass: i32,
	pub drag: i32,
	pub brakes: i32,
	pub rot_velocity: IVec3,
	pub rot_thrust: IVec3,
	/// Fixed angle.
	pub turn_roll: i16,
	pub flags: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpinInfo {
	/// 16.16 fixed-point rotation rate.
	pub rate: IVec3,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Movement {
	#[default]
	None,
	Physics(PhysicsInfo),
	Spinning(SpinInfo),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AiInfo {
	pub behavior: u8,
	pub flags: [u8; NUM_AI_FLAGS],
	/// Index into `Level.segments`.
	pub hide_segment: i16,
	pub hide_index: i16,
	pub path_length: i16,
	pub cur_path_index: i16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExplosionInfo {
	/// 16.16 fixed-point.
	pub spawn_time: i32,
	pub delete_time: i32,
	/// Index into `Level.objects`.
	pub delete_object: i16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeaponInfo {
	pub parent_kind: i16,
	/// Index into `Level.objects`.
	pub parent_num: i16,
	pub parent_signature: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PowerupInfo {
	pub count: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightInfo {
	/// 16.16 fixed-point.
	pub intensity: i32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Control {
	#[default]
	None,
	Ai(AiInfo),
	Explosion(ExplosionInfo),
	Weapon(WeaponInfo),
	Powerup(PowerupInfo),
	Light(LightInfo),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolyobjInfo {
	pub model: i32,
	/// Fixed-angle triples, one per submodel.
	pub anim_angles: [I16Vec3; MAX_SUBMODELS],
	pub subobj_flags: i32,
	pub texture_override: i32,
}

impl Default for PolyobjInfo {
	fn default() -> Self {
		Self {
			model: 0,
			anim_angles: [I16Vec3::ZERO; MAX_SUBMODELS],
			subobj_flags: 0,
			texture_override: 0,
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VclipInfo {
	pub vclip: i32,
	/// 16.16 fixed-point.
	pub frame_time: i32,
	pub frame: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Render {
	#[default]
	None,
	Polyobj(PolyobjInfo),
	Morph(PolyobjInfo),
	Fireball(VclipInfo),
	Hostage(VclipInfo),
	Powerup(VclipInfo),
	WeaponVclip(VclipInfo),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contains {
	pub kind: u8,
	pub id: u8,
	pub count: u8,
}

#[derive(Clone, Debug)]
pub struct Object {
	pub kind: u8,
	pub id: u8,
	pub flags: u8,
	/// Index into `Level.segments`.
	pub segment: u16,
	/// 16.16 fixed-point world coords.
	pub pos: IVec3,
	pub orient: Matrix,
	/// 16.16 fixed-point.
	pub size: i32,
	/// 16.16 fixed-point.
	pub shields: i32,
	pub last_pos: IVec3,
	pub contains: Contains,
	pub movement: Movement,
	pub control: Control,
	pub render: Render,
}
