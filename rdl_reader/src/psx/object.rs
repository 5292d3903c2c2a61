use std::io::Read;
use byteorder::{ReadBytesExt, LE};
use glam::{I16Vec3, IVec3};
use rdl_model::object::{
	control_type, movement_type, render_type, AiInfo, Contains, Control, ExplosionInfo, LightInfo,
	Movement, Object, PhysicsInfo, PolyobjInfo, PowerupInfo, Render, SpinInfo, VclipInfo,
	WeaponInfo, MAX_SUBMODELS, NUM_AI_FLAGS,
};
use rdl_model::Matrix;
use crate::{check_index, read_slot, Readable, Result};

//slot sizes are fixed per axis, tag byte excluded; every tag consumes the
//whole slot or every record after it desynchronizes
pub(crate) const MOVEMENT_SLOT: u64 = 64;
pub(crate) const CONTROL_SLOT: u64 = 32;
pub(crate) const RENDER_SLOT: u64 = 76;

pub(crate) fn read_object<R: Read>(reader: &mut R, num_segments: usize) -> Result<Object> {
	let kind = reader.read_u8()?;
	let id = reader.read_u8()?;
	let control_tag = reader.read_u8()?;
	let movement_tag = reader.read_u8()?;
	let render_tag = reader.read_u8()?;
	let flags = reader.read_u8()?;
	let segment = check_index("segment", reader.read_i16::<LE>()? as i32, num_segments)? as u16;
	let pos = IVec3::read(reader)?;
	let orient = Matrix::read(reader)?;
	let size = reader.read_i32::<LE>()?;
	let shields = reader.read_i32::<LE>()?;
	let last_pos = IVec3::read(reader)?;
	let contains = Contains {
		kind: reader.read_u8()?,
		id: reader.read_u8()?,
		count: reader.read_u8()?,
	};
	let movement = read_slot(reader, MOVEMENT_SLOT, |slot| read_movement(slot, movement_tag))?;
	let control = read_slot(reader, CONTROL_SLOT, |slot| read_control(slot, control_tag))?;
	let render = read_slot(reader, RENDER_SLOT, |slot| read_render(slot, render_tag))?;
	Ok(Object {
		kind,
		id,
		flags,
		segment,
		pos,
		orient,
		size,
		shields,
		last_pos,
		contains,
		movement,
		control,
		render,
	})
}

//unknown tags decode as the none variant; the slot discard keeps alignment

fn read_movement<R: Read>(reader: &mut R, tag: u8) -> Result<Movement> {
	Ok(match tag {
		movement_type::PHYSICS => Movement::Physics(PhysicsInfo::read(reader)?),
		movement_type::SPINNING => Movement::Spinning(SpinInfo { rate: IVec3::read(reader)? }),
		_ => Movement::None,
	})
}

fn read_control<R: Read>(reader: &mut R, tag: u8) -> Result<Control> {
	Ok(match tag {
		control_type::AI => Control::Ai(AiInfo::read(reader)?),
		control_type::EXPLOSION => Control::Explosion(ExplosionInfo::read(reader)?),
		control_type::WEAPON => Control::Weapon(WeaponInfo::read(reader)?),
		control_type::POWERUP => Control::Powerup(PowerupInfo { count: reader.read_i32::<LE>()? }),
		control_type::LIGHT => Control::Light(LightInfo { intensity: reader.read_i32::<LE>()? }),
		_ => Control::None,
	})
}

fn read_render<R: Read>(reader: &mut R, tag: u8) -> Result<Render> {
	Ok(match tag {
		render_type::POLYOBJ => Render::Polyobj(PolyobjInfo::read(reader)?),
		render_type::MORPH => Render::Morph(PolyobjInfo::read(reader)?),
		render_type::FIREBALL => Render::Fireball(VclipInfo::read(reader)?),
		render_type::HOSTAGE => Render::Hostage(VclipInfo::read(reader)?),
		render_type::POWERUP => Render::Powerup(VclipInfo::read(reader)?),
		render_type::WEAPON_VCLIP => Render::WeaponVclip(VclipInfo::read(reader)?),
		_ => Render::None,
	})
}

impl Readable for PhysicsInfo {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(PhysicsInfo {
			velocity: IVec3::read(reader)?,
			thrust: IVec3::read(reader)?,
			mass: reader.read_i32::<LE>()?,
			drag: reader.read_i32::<LE>()?,
			brakes: reader.read_i32::<LE>()?,
			rot_velocity: IVec3::read(reader)?,
			rot_thrust: IVec3::read(reader)?,
			turn_roll: reader.read_i16::<LE>()?,
			flags: reader.read_u16::<LE>()?,
		})
	}
}

impl Readable for AiInfo {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let behavior = reader.read_u8()?;
		let mut flags = [0; NUM_AI_FLAGS];
		for flag in &mut flags {
			*flag = reader.read_u8()?;
		}
		Ok(AiInfo {
			behavior,
			flags,
			hide_segment: reader.read_i16::<LE>()?,
			hide_index: reader.read_i16::<LE>()?,
			path_length: reader.read_i16::<LE>()?,
			cur_path_index: reader.read_i16::<LE>()?,
		})
	}
}

impl Readable for ExplosionInfo {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(ExplosionInfo {
			spawn_time: reader.read_i32::<LE>()?,
			delete_time: reader.read_i32::<LE>()?,
			delete_object: reader.read_i16::<LE>()?,
		})
	}
}

impl Readable for WeaponInfo {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(WeaponInfo {
			parent_kind: reader.read_i16::<LE>()?,
			parent_num: reader.read_i16::<LE>()?,
			parent_signature: reader.read_i32::<LE>()?,
		})
	}
}

impl Readable for PolyobjInfo {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(PolyobjInfo {
			model: reader.read_i32::<LE>()?,
			anim_angles: <[I16Vec3; MAX_SUBMODELS]>::read(reader)?,
			subobj_flags: reader.read_i32::<LE>()?,
			texture_override: reader.read_i32::<LE>()?,
		})
	}
}

impl Readable for VclipInfo {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(VclipInfo {
			vclip: reader.read_i32::<LE>()?,
			frame_time: reader.read_i32::<LE>()?,
			frame: reader.read_u8()?,
		})
	}
}
