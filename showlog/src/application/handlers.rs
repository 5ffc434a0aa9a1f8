use std::io::Write;

use showlog_core::error::Result;
use showlog_core::format::{write_dirs, write_nukes};
use showlog_core::{
    DirStatus, Exclusions, LayoutVariant, NukeStatus, OutputFormat, Query, Settings, newest_dirs,
    newest_nukes, open_log,
};
use tracing::debug;

pub fn handle_newdirs<W: Write>(
    out: &mut W,
    settings: &Settings,
    layout: LayoutVariant,
    query: &Query,
    fmt: OutputFormat,
) -> Result<()> {
    let path = settings.dirlog_path();
    let f = open_log(&path, "dirlog")?;
    let exclusions = Exclusions::default();
    let entries = newest_dirs(f, layout, DirStatus::NewDir, query, &exclusions);
    let n = write_dirs(out, entries, fmt)?;
    out.flush()?;
    debug!(n, path = %path.display(), %layout, "dirlog entries written");
    Ok(())
}

pub fn handle_nukes<W: Write>(
    out: &mut W,
    settings: &Settings,
    layout: LayoutVariant,
    status: NukeStatus,
    query: &Query,
    fmt: OutputFormat,
) -> Result<()> {
    let path = settings.nukelog_path();
    let f = open_log(&path, "nukelog")?;
    let entries = newest_nukes(f, layout, status, query);
    let n = write_nukes(out, entries, fmt)?;
    out.flush()?;
    debug!(n, path = %path.display(), %layout, "nukelog entries written");
    Ok(())
}
