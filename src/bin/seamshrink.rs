#[macro_use]
extern crate clap;

use clap::{App, Arg, ArgMatches};
use seamshrink::{io, CarveError, CarveOptions, SeededNoise, ShrinkController, SnapshotWriter};
use std::process;

fn options_from(matches: &ArgMatches) -> CarveOptions {
    let defaults = CarveOptions::default();
    CarveOptions {
        shrink_width: value_t!(matches, "shrink-width", u32).unwrap_or_else(|e| e.exit()),
        shrink_height: value_t!(matches, "shrink-height", u32).unwrap_or_else(|e| e.exit()),
        lock_aspect: matches.is_present("lock-aspect"),
        max_shift: value_t!(matches, "max-shift", usize).unwrap_or_else(|e| e.exit()),
        noise_amplitude: value_t!(matches, "noise", f64).unwrap_or_else(|e| e.exit()),
        snapshot_every: if matches.is_present("every") {
            value_t!(matches, "every", usize).unwrap_or_else(|e| e.exit())
        } else {
            defaults.snapshot_every
        },
        trace_seams: matches.is_present("trace-seams"),
    }
}

fn run(matches: &ArgMatches) -> Result<(), CarveError> {
    let options = options_from(matches);
    let input = matches.value_of("input").unwrap_or_default();
    let output = matches.value_of("output").unwrap_or_default();

    let image = io::load(input)?;
    let writer = match matches.value_of("snapshots") {
        Some(dir) => Some(SnapshotWriter::new(dir)?),
        None => None,
    };

    let mut controller = ShrinkController::new(image, options)?;
    if matches.is_present("seed") {
        let seed = value_t!(matches, "seed", u64).unwrap_or_else(|e| e.exit());
        controller = controller.with_noise(SeededNoise::new(seed));
    }
    if let Some(writer) = &writer {
        controller = controller.with_sink(writer);
    }

    let result = controller.run()?;
    if let Some(writer) = writer {
        writer.finish();
    }
    io::save(&result, output)
}

fn main() {
    env_logger::init();

    let matches = App::new("seamshrink")
        .version(crate_version!())
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Shrink an image by carving out its lowest-contrast seams")
        .arg(
            Arg::with_name("input")
                .help("The image to shrink")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the result (PNG recommended)")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("shrink-width")
                .short("w")
                .long("shrink-width")
                .takes_value(true)
                .default_value("0")
                .help("Pixels to remove from the width"),
        )
        .arg(
            Arg::with_name("shrink-height")
                .short("H")
                .long("shrink-height")
                .takes_value(true)
                .default_value("0")
                .help("Pixels to remove from the height"),
        )
        .arg(
            Arg::with_name("lock-aspect")
                .long("lock-aspect")
                .help("Derive the height reduction from the width reduction"),
        )
        .arg(
            Arg::with_name("max-shift")
                .long("max-shift")
                .takes_value(true)
                .default_value("1")
                .help("How far a seam may drift between neighbouring lines"),
        )
        .arg(
            Arg::with_name("noise")
                .long("noise")
                .takes_value(true)
                .default_value("0.05")
                .allow_hyphen_values(true)
                .help("Amplitude of the tie-breaking jitter added to every cost"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed the jitter so that runs are repeatable"),
        )
        .arg(
            Arg::with_name("snapshots")
                .long("snapshots")
                .takes_value(true)
                .value_name("DIR")
                .help("Write progress snapshots into DIR"),
        )
        .arg(
            Arg::with_name("every")
                .long("every")
                .takes_value(true)
                .requires("snapshots")
                .help("Snapshot every N carves (default 20, 0 for none)"),
        )
        .arg(
            Arg::with_name("trace-seams")
                .long("trace-seams")
                .requires("snapshots")
                .help("Also dump the cost field with its seam at each snapshot"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("seamshrink: {}", e);
        process::exit(1);
    }
}
