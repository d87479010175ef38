use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::catalogue::WorldCatalogue;
use crate::model::WorldState;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Dump world and catalogue state to JSONL files in the given directory.
/// Debug observability only, not a save format. Writes 3 files:
/// - `factions.jsonl` — one live faction per line
/// - `settlements.jsonl` — one settlement per line
/// - `templates.jsonl` — one faction template per line
pub fn snapshot_to_jsonl(
    world: &WorldState,
    catalogue: &WorldCatalogue,
    output_dir: &Path,
) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    write_jsonl(&output_dir.join("factions.jsonl"), world.factions.values())?;
    write_jsonl(
        &output_dir.join("settlements.jsonl"),
        world.settlements.values(),
    )?;
    write_jsonl(&output_dir.join("templates.jsonl"), catalogue.templates())?;

    Ok(())
}
