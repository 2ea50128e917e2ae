//! Command dispatch: bridges CLI args -> camera calls -> output formatting.

pub mod image;
pub mod params;
pub mod system;
pub mod users;

use vapix_core::Camera;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a camera-bound command to the appropriate handler.
pub fn dispatch(cmd: &Command, camera: &Camera, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Report(args) => system::report(camera, args, global),
        Command::Log => system::log(camera, global),
        Command::Params(args) => params::handle(camera, args, global),
        Command::Users => users::handle(camera, global),
        Command::Image(args) => image::handle(camera, args),
        // Completions are handled before dispatch
        Command::Completions(_) => Ok(()),
    }
}
