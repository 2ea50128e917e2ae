//! User group listing handler.

use vapix_core::{Camera, UserGroups};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub fn handle(camera: &Camera, global: &GlobalOpts) -> Result<(), CliError> {
    let users = camera.users()?;
    let rendered = output::render(global.output, &users, plain_users)?;
    output::print_output(&rendered)
}

fn plain_users(users: &UserGroups) -> String {
    users
        .groups()
        .map(|(group, members)| format!("{group}: {}", members.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
