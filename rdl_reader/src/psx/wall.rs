use std::io::Read;
use byteorder::{ReadBytesExt, LE};
use nonmax::{NonMaxU16, NonMaxU8};
use rdl_model::{Level, SideId, Trigger, Wall, NUM_REACTOR_TARGETS, NUM_SIDES, NUM_TRIGGER_TARGETS};
use crate::{check_index, Readable, Result};

const NO_LINKED_WALL: i32 = -1;
const NO_TRIGGER: u8 = 0xFF;

/// Raw index pairs remembered while walls are read. Linked walls and triggers
/// point at records not yet materialized at that point, so resolution waits
/// until the target sequences are fully populated.
pub(crate) struct PendingLinks {
	/// (index into `Level.walls`, raw linked-wall index).
	pub linked: Vec<(u16, i32)>,
	/// (index into `Level.walls`, raw trigger index).
	pub triggers: Vec<(u16, u8)>,
}

pub(crate) fn read_walls<R: Read>(
	reader: &mut R, level: &mut Level, num_walls: usize,
) -> Result<PendingLinks> {
	let mut pending = PendingLinks { linked: Vec::new(), triggers: Vec::new() };
	for index in 0..num_walls {
		let segment = check_index("segment", reader.read_i32::<LE>()?, level.segments.len())? as u16;
		let side = check_index("side", reader.read_i32::<LE>()?, NUM_SIDES)? as u8;
		let hit_points = reader.read_i32::<LE>()?;
		let linked_wall = reader.read_i32::<LE>()?;
		let kind = reader.read_u8()?;
		let flags = reader.read_u8()?;
		let state = reader.read_u8()?;
		let trigger = reader.read_u8()?;
		let clip = reader.read_u8()?;
		let keys = reader.read_u8()?;
		let cloak = NonMaxU8::new(reader.read_u8()?);
		reader.read_u8()?;//pad
		if linked_wall != NO_LINKED_WALL {
			pending.linked.push((index as u16, linked_wall));
		}
		if trigger != NO_TRIGGER {
			pending.triggers.push((index as u16, trigger));
		}
		level.walls.push(Wall {
			segment,
			side,
			hit_points,
			kind,
			flags,
			state,
			clip,
			keys,
			cloak,
			linked_wall: None,
			trigger: None,
			controlling_triggers: Vec::new(),
		});
	}
	Ok(pending)
}

/// The raw record only ever stores a linked pair in the direction it was
/// written; the relation is materialized on both participants here, so an
/// asymmetric encoding still comes out mutual.
pub(crate) fn resolve_wall_links(level: &mut Level, linked: &[(u16, i32)]) -> Result<()> {
	for &(wall, raw) in linked {
		let target = check_index("wall", raw, level.walls.len())?;
		level.walls[wall as usize].linked_wall = NonMaxU16::new(target as u16);
		level.walls[target].linked_wall = NonMaxU16::new(wall);
	}
	Ok(())
}

pub(crate) fn resolve_wall_triggers(level: &mut Level, pending: &[(u16, u8)]) -> Result<()> {
	for &(wall, raw) in pending {
		let trigger = check_index("trigger", raw as i32, level.triggers.len())?;
		level.walls[wall as usize].trigger = NonMaxU8::new(raw);
		level.triggers[trigger].walls.push(wall);
	}
	Ok(())
}

pub(crate) fn read_triggers<R: Read>(
	reader: &mut R, level: &mut Level, num_triggers: usize,
) -> Result<()> {
	for index in 0..num_triggers {
		let kind = reader.read_u8()?;
		let flags = reader.read_u16::<LE>()?;
		let value = reader.read_i32::<LE>()?;
		let time = reader.read_i32::<LE>()?;
		let num_links = reader.read_i16::<LE>()?.max(0) as usize;
		//the full capacity is always present in the stream, whatever the count
		let segments = <[i16; NUM_TRIGGER_TARGETS]>::read(reader)?;
		let sides = <[i16; NUM_TRIGGER_TARGETS]>::read(reader)?;
		let targets = resolve_targets(level, &segments, &sides, num_links.min(NUM_TRIGGER_TARGETS))?;
		for (ordinal, target) in targets.iter().enumerate() {
			//walls are all read by now, so this is a single forward pass
			let wall = level
				.walls
				.iter()
				.position(|wall| wall.segment == target.segment && wall.side == target.side);
			if let Some(wall) = wall {
				level.walls[wall].controlling_triggers.push((index as u8, ordinal as u8));
			}
		}
		level.triggers.push(Trigger { kind, flags, value, time, targets, walls: Vec::new() });
	}
	Ok(())
}

pub(crate) fn read_reactor_targets<R: Read>(reader: &mut R, level: &mut Level) -> Result<()> {
	let count = reader.read_u16::<LE>()? as usize;
	let segments = <[i16; NUM_REACTOR_TARGETS]>::read(reader)?;
	let sides = <[i16; NUM_REACTOR_TARGETS]>::read(reader)?;
	level.reactor_targets = resolve_targets(level, &segments, &sides, count.min(NUM_REACTOR_TARGETS))?;
	Ok(())
}

fn resolve_targets(level: &Level, segments: &[i16], sides: &[i16], count: usize) -> Result<Vec<SideId>> {
	let mut targets = Vec::with_capacity(count);
	for i in 0..count {
		let segment = check_index("segment", segments[i] as i32, level.segments.len())? as u16;
		let side = check_index("side", sides[i] as i32, NUM_SIDES)? as u8;
		targets.push(SideId { segment, side });
	}
	Ok(targets)
}
