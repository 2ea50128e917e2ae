//! Parameter listing handler.

use std::fmt::Write as _;

use vapix_core::{AccessLevel, Camera, ParameterQuery, ParameterTree, Parameters};

use crate::cli::{GlobalOpts, Level, ParamsArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(camera: &Camera, args: &ParamsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let query = query(args);

    let rendered = if args.tree {
        let tree = camera.parameter_tree(&query)?;
        output::render(global.output, &tree, plain_tree)?
    } else {
        let params = camera.parameters(&query)?;
        output::render(global.output, &params, plain_params)?
    };
    output::print_output(&rendered)
}

fn query(args: &ParamsArgs) -> ParameterQuery {
    let level = match args.level {
        Level::Admin => AccessLevel::Admin,
        Level::Operator => AccessLevel::Operator,
        Level::Viewer => AccessLevel::Viewer,
    };
    ParameterQuery {
        group: args.group.clone(),
        level,
    }
}

fn plain_params(params: &Parameters) -> String {
    params
        .iter()
        .map(|(path, value)| format!("{path}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn plain_tree(tree: &ParameterTree) -> String {
    let mut out = String::new();
    write_tree(&mut out, tree, 0);
    out
}

fn write_tree(out: &mut String, tree: &ParameterTree, depth: usize) {
    let Some(children) = tree.children() else {
        return;
    };
    for (name, child) in children {
        let indent = "  ".repeat(depth);
        match child {
            ParameterTree::Leaf(value) => {
                let _ = writeln!(out, "{indent}{name} = {value}");
            }
            ParameterTree::Node(_) => {
                let _ = writeln!(out, "{indent}{name}");
                write_tree(out, child, depth + 1);
            }
        }
    }
}
