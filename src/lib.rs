// Terminal client for district employment-scheme performance.
//
// Raw API records are read through `fields::resolve`, which absorbs the
// several key spellings upstream sources use, and rendered with the
// Indian-unit formatters in `format`.
pub mod client;
pub mod config;
pub mod fields;
pub mod format;
pub mod geo;
pub mod labels;
pub mod output;
pub mod speech;
pub mod state;
pub mod trend;
pub mod types;
pub mod util;
