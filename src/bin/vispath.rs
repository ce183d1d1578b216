//! # vispath
//!
//! CLI for building visibility graphs over obstacle polygons and routing
//! shortest obstacle-avoiding paths through them.

use clap::{crate_version, App, Arg, SubCommand};
use vispath::{Engine, EngineConfig, Point};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
struct RouteQuery {
	origin: (f64, f64),
	destination: (f64, f64),
}

fn main() -> std::io::Result<()> {
	env_logger::init_from_env(env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "info"));
	let matches = App::new("vispath")
							.version(crate_version!())
							.about("Build visibility graphs and route obstacle-avoiding paths")
							.subcommand(SubCommand::with_name("build")
								.about("Build a visibility graph over obstacle polygons and persist it")
								.arg(Arg::with_name("polygons")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Obstacle polygons JSON: array of point-lists, each point {\"x\":.., \"y\":.., \"polygon_id\":-1} (polygon_id is ignored and reassigned per polygon)"))
								.arg(Arg::with_name("output")
										.takes_value(true)
										.required(true)
										.index(2)
										.help("Output engine blob"))
								.arg(Arg::with_name("workers")
										.short("j")
										.takes_value(true)
										.default_value("1")
										.validator(|s| s.parse::<usize>().map(|_| ()).map_err(|e| e.to_string()))
										.help("Parallel builder worker count"))
							)
							.subcommand(SubCommand::with_name("route")
								.about("Query a shortest obstacle-avoiding path")
								.arg(Arg::with_name("engine")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Engine blob produced by `build`"))
								.arg(Arg::with_name("query")
										.takes_value(true)
										.required(true)
										.index(2)
										.help("Route query JSON: {\"origin\": [x,y], \"destination\": [x,y]}"))
							)
							.subcommand(SubCommand::with_name("visible")
								.about("List vertices visible from a point")
								.arg(Arg::with_name("engine")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Engine blob produced by `build`"))
								.arg(Arg::with_name("x")
										.takes_value(true)
										.required(true)
										.index(2)
										.validator(|s| s.parse::<f64>().map(|_| ()).map_err(|e| e.to_string())))
								.arg(Arg::with_name("y")
										.takes_value(true)
										.required(true)
										.index(3)
										.validator(|s| s.parse::<f64>().map(|_| ()).map_err(|e| e.to_string())))
							)
							.subcommand(SubCommand::with_name("geojson")
								.about("Convert obstacle polygons to a GeoJSON FeatureCollection")
								.arg(Arg::with_name("polygons")
										.takes_value(true)
										.required(true)
										.index(1)
										.help("Obstacle polygons JSON: array of point-lists, each point {\"x\":.., \"y\":.., \"polygon_id\":-1} (polygon_id is ignored and reassigned per polygon)"))
								.arg(Arg::with_name("output")
										.takes_value(true)
										.required(true)
										.index(2)
										.help("Output GeoJSON file"))
							)
							.get_matches();

	log::info!("Loading...");
	if let Some(matches) = matches.subcommand_matches("build") {
		let polygons: Vec<Vec<Point>> = serde_json::from_reader(&std::fs::File::open(matches.value_of("polygons").unwrap())?)
			.expect("polygons invalid JSON");
		let workers: usize = matches.value_of("workers").unwrap().parse().unwrap();
		log::info!("Loaded {} polygons", polygons.len());
		let mut engine = Engine::new(EngineConfig::default());
		engine.build(&polygons, workers, true).expect("failed to build visibility graph");
		log::info!("Built visibility graph: {} points, {} edges", engine.point_count(), engine.visibility_edge_count());
		engine.save(matches.value_of("output").unwrap()).expect("failed to persist engine");
	} else if let Some(matches) = matches.subcommand_matches("route") {
		let engine = Engine::load(matches.value_of("engine").unwrap()).expect("failed to load engine");
		let query: RouteQuery = serde_json::from_reader(&std::fs::File::open(matches.value_of("query").unwrap())?).expect("query invalid JSON");
		log::info!("Loaded configuration");
		let (ox, oy) = query.origin;
		let (dx, dy) = query.destination;
		let path = engine.shortest_path(Point::new(ox, oy), Point::new(dx, dy)).expect("no route found");
		serde_json::to_writer(std::io::stdout(), &path.into_iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()).unwrap();
	} else if let Some(matches) = matches.subcommand_matches("visible") {
		let engine = Engine::load(matches.value_of("engine").unwrap()).expect("failed to load engine");
		let x: f64 = matches.value_of("x").unwrap().parse().unwrap();
		let y: f64 = matches.value_of("y").unwrap().parse().unwrap();
		let vis = engine.find_visible(Point::new(x, y));
		serde_json::to_writer(std::io::stdout(), &vis.into_iter().map(|p| (p.x, p.y)).collect::<Vec<_>>()).unwrap();
	} else if let Some(matches) = matches.subcommand_matches("geojson") {
		let polygons: Vec<Vec<Point>> = serde_json::from_reader(&std::fs::File::open(matches.value_of("polygons").unwrap())?)
			.expect("polygons invalid JSON");
		log::info!("Loaded {} polygons", polygons.len());
		let fc = vispath::gj::polygons_to_geojson(&polygons);
		serde_json::to_writer(&std::fs::File::create(matches.value_of("output").unwrap())?, &fc).unwrap();
	}
	Ok(())
}
