//! Snapshot handler: writes the image bytes to a file or stdout.

use std::io::{self, Write};
use std::path::Path;

use vapix_core::{Camera, ImageOptions, Rotation};

use crate::cli::{ImageArgs, RotationArg};
use crate::error::CliError;

pub fn handle(camera: &Camera, args: &ImageArgs) -> Result<(), CliError> {
    let options = options(args);
    let bytes = if args.bitmap {
        camera.bitmap(&options)?
    } else {
        camera.image(&options)?
    };

    if args.out == Path::new("-") {
        io::stdout().lock().write_all(&bytes)?;
    } else {
        std::fs::write(&args.out, &bytes)?;
        eprintln!("Saved {} bytes to {}", bytes.len(), args.out.display());
    }
    Ok(())
}

fn options(args: &ImageArgs) -> ImageOptions {
    ImageOptions {
        resolution: args.resolution.clone(),
        camera: args.camera,
        compression: args.compression,
        color: args.color,
        color_level: args.color_level,
        clock: args.clock,
        date: args.date,
        text: args.text.clone(),
        rotation: args.rotation.map(|r| match r {
            RotationArg::R0 => Rotation::None,
            RotationArg::R90 => Rotation::Quarter,
            RotationArg::R180 => Rotation::Half,
            RotationArg::R270 => Rotation::ThreeQuarter,
        }),
        mirror: args.mirror,
        square_pixel: args.square_pixel,
    }
}
