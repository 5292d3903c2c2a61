use std::io::Read;
use arrayvec::ArrayVec;
use byteorder::{ReadBytesExt, LE};
use glam::{I16Vec3, IVec3};
use nonmax::{NonMaxU16, NonMaxU8};
use rdl_model::Matrix;
use crate::{Readable, Result};

//primitive impls

macro_rules! impl_readable_prim {
	($type:ty, $func:ident $(, $($endian:tt)*)?) => {
		impl Readable for $type {
			fn read<R: Read>(reader: &mut R) -> Result<Self> {
				Ok(reader.$func$($($endian)*)?()?)
			}
		}
	};
}

macro_rules! impl_readable_prim_le {
	($type:ty, $func:ident) => {
		impl_readable_prim!($type, $func, ::<LE>);
	};
}

impl_readable_prim!(u8, read_u8);
impl_readable_prim!(i8, read_i8);
impl_readable_prim_le!(u16, read_u16);
impl_readable_prim_le!(i16, read_i16);
impl_readable_prim_le!(u32, read_u32);
impl_readable_prim_le!(i32, read_i32);

//array impl

impl<T: Readable, const N: usize> Readable for [T; N] {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		let mut array = ArrayVec::new();
		for _ in 0..N {
			array.push(T::read(reader)?);
		}
		Ok(array.into_inner().ok().unwrap())//reads exactly N items
	}
}

//nonmax impls

impl Readable for Option<NonMaxU8> {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(NonMaxU8::new(reader.read_u8()?))
	}
}

impl Readable for Option<NonMaxU16> {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(NonMaxU16::new(reader.read_u16::<LE>()?))
	}
}

//fixed-point geometry impls

impl Readable for IVec3 {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(IVec3::new(i32::read(reader)?, i32::read(reader)?, i32::read(reader)?))
	}
}

impl Readable for I16Vec3 {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(I16Vec3::new(i16::read(reader)?, i16::read(reader)?, i16::read(reader)?))
	}
}

impl Readable for Matrix {
	fn read<R: Read>(reader: &mut R) -> Result<Self> {
		Ok(Matrix {
			right: IVec3::read(reader)?,
			up: IVec3::read(reader)?,
			forward: IVec3::read(reader)?,
		})
	}
}
