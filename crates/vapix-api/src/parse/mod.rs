// Parsers for the camera's plain-text response dialects.
//
// Both parsers are total: malformed input degrades to an empty or partial
// result instead of an error, because report and parameter formats drift
// between firmware releases.

pub mod params;
pub mod report;

pub use params::{ParamValue, ParameterTree, Parameters, parse_parameter_tree, parse_parameters, parse_value};
pub use report::{ServerReport, normalize_section_name, parse_server_report};
