use std::{env::args, fs::File, io::BufReader, process::ExitCode};
use log::{error, info};
use rdl_model::Connection;

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let Some(path) = args().nth(1) else {
		eprintln!("usage: rdl_tool <level>");
		return ExitCode::FAILURE;
	};
	let file = match File::open(&path) {
		Ok(file) => file,
		Err(err) => {
			error!("{path}: {err}");
			return ExitCode::FAILURE;
		}
	};
	let level = match rdl_reader::psx::read_level(&mut BufReader::new(file)) {
		Ok(level) => level,
		Err(err) => {
			error!("{path}: {err}");
			return ExitCode::FAILURE;
		}
	};
	let exits = level
		.segments
		.iter()
		.flat_map(|segment| &segment.sides)
		.filter(|side| side.connection == Connection::Exit)
		.count();
	info!(
		"{}: {} segments ({} exit sides), {} vertices, {} objects, {} walls, {} triggers, {} matcens",
		level.name,
		level.segments.len(),
		exits,
		level.vertices.len(),
		level.objects.len(),
		level.walls.len(),
		level.triggers.len(),
		level.matcens.len(),
	);
	ExitCode::SUCCESS
}
