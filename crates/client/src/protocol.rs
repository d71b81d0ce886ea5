//! Console protocol: the thin typed boundary around stdin/stdout.
//!
//! Setup input: width, height, the map rows, then the four game tunables
//! on one line. Per turn: an entity count followed by that many
//! `kind id x y p0 p1 p2` records. Output: one fully-qualified command
//! line per turn.

use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use kutulu_core::{Action, EntityKind, EntityRecord, GameConfig, TurnSnapshot};

/// Everything delivered once before the first turn.
#[derive(Clone, Debug)]
pub struct InitInput {
    pub width: u32,
    pub height: u32,
    pub rows: Vec<String>,
    pub config: GameConfig,
}

/// Reads the setup block.
pub fn read_init<R: BufRead>(input: &mut R) -> Result<InitInput> {
    let width: u32 = read_line(input)?
        .context("missing width line")?
        .trim()
        .parse()
        .context("parsing map width")?;
    let height: u32 = read_line(input)?
        .context("missing height line")?
        .trim()
        .parse()
        .context("parsing map height")?;

    let mut rows = Vec::with_capacity(height as usize);
    for index in 0..height {
        let row = read_line(input)?.with_context(|| format!("missing map row {index}"))?;
        rows.push(row);
    }

    let settings = read_line(input)?.context("missing settings line")?;
    let mut fields = settings.split_whitespace().map(str::parse::<i32>);
    let mut next_setting = |name: &str| -> Result<i32> {
        fields
            .next()
            .with_context(|| format!("missing setting {name}"))?
            .with_context(|| format!("parsing setting {name}"))
    };
    let config = GameConfig::new(
        next_setting("sanity_loss_lonely")?,
        next_setting("sanity_loss_group")?,
        next_setting("wanderer_spawn_time")?,
        next_setting("wanderer_life_time")?,
    );

    Ok(InitInput {
        width,
        height,
        rows,
        config,
    })
}

/// Reads one turn snapshot, or `None` on a clean end of input.
pub fn read_snapshot<R: BufRead>(input: &mut R) -> Result<Option<TurnSnapshot>> {
    let Some(count_line) = read_line(input)? else {
        return Ok(None);
    };
    let count: usize = count_line
        .trim()
        .parse()
        .context("parsing entity count")?;

    let mut records = Vec::with_capacity(count);
    for index in 0..count {
        let line = read_line(input)?.with_context(|| format!("missing entity record {index}"))?;
        records.push(parse_record(&line).with_context(|| format!("entity record {index}"))?);
    }

    Ok(Some(TurnSnapshot::new(records)))
}

/// Parses one `kind id x y p0 p1 p2` record.
fn parse_record(line: &str) -> Result<EntityRecord> {
    let mut fields = line.split_whitespace();
    let kind_token = fields.next().context("missing kind field")?;
    let kind =
        EntityKind::from_str(kind_token).with_context(|| format!("unknown kind {kind_token}"))?;

    let mut next_int = |name: &str| -> Result<i32> {
        fields
            .next()
            .with_context(|| format!("missing field {name}"))?
            .parse()
            .with_context(|| format!("parsing field {name}"))
    };

    let record = EntityRecord {
        kind,
        id: next_int("id")?,
        x: next_int("x")?,
        y: next_int("y")?,
        p0: next_int("p0")?,
        p1: next_int("p1")?,
        p2: next_int("p2")?,
    };

    if fields.next().is_some() {
        bail!("trailing fields in record");
    }
    Ok(record)
}

/// Writes one command line, flushed so the referee sees it immediately.
pub fn write_command<W: Write>(output: &mut W, action: Action) -> Result<()> {
    writeln!(output, "{action}").context("writing command")?;
    output.flush().context("flushing command")
}

/// Reads one line, `None` at end of input, with the newline trimmed.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let bytes = input.read_line(&mut line).context("reading input line")?;
    if bytes == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}
