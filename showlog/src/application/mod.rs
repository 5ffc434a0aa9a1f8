pub mod handlers;

use std::io::Write;

use crate::presentation::cli::{Action, Cli};
use showlog_core::error::Result;
use showlog_core::{LayoutVariant, NukeStatus, Settings};

pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let layout = LayoutVariant::build_default();
    let settings = Settings::load(&cli.config);
    let query = cli.query();
    let fmt = cli.output_format();
    match cli.action() {
        Action::NewDirs => handlers::handle_newdirs(out, &settings, layout, &query, fmt),
        Action::Nukes => {
            handlers::handle_nukes(out, &settings, layout, NukeStatus::Nuked, &query, fmt)
        }
        Action::Unnukes => {
            handlers::handle_nukes(out, &settings, layout, NukeStatus::Unnuked, &query, fmt)
        }
    }
}
