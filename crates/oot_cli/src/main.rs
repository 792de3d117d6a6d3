use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use oot_core::core_api::{ConsoleVersion, Engine, Session, SoundMode, TargetingMode};
use oot_render::{FieldSelection, render_json_full, render_json_selected, render_pairs, render_text};
use tracing::{debug, metadata::LevelFilter};
use tracing_subscriber::{EnvFilter, prelude::*};

const EXIT_FAILURE: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_INTEGRITY: i32 = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SoundArg {
    Stereo,
    Mono,
    Headset,
    Surround,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TargetingArg {
    Switch,
    Hold,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.SRA", required_unless_present = "blank")]
    path: Option<PathBuf>,
    /// Start from an empty save instead of reading a file.
    #[arg(long, conflicts_with = "path")]
    blank: bool,
    /// Restrict field output to one file slot.
    #[arg(long, value_name = "1|2|3", value_parser = clap::value_parser!(u8).range(1..=3))]
    slot: Option<u8>,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    rupees: bool,
    #[arg(long)]
    deaths: bool,
    #[arg(long)]
    hearts: bool,
    #[arg(long)]
    health: bool,
    #[arg(long)]
    skulltulas: bool,
    #[arg(long)]
    defense: bool,
    #[arg(long)]
    quest: bool,
    #[arg(long)]
    settings: bool,
    #[arg(long)]
    json: bool,
    /// Verify every checksum and exit with status 3 on any mismatch.
    #[arg(long)]
    check: bool,
    /// RDRAM dump holding an in-progress file to copy into the save.
    #[arg(long = "import-ram", value_name = "RAM.BIN", requires_all = ["console", "into_slot"])]
    import_ram: Option<PathBuf>,
    #[arg(
        long,
        value_name = "ntsc-1.0|ntsc-1.1|ntsc-1.2|pal-1.0|pal-1.1",
        value_parser = parse_console,
        requires = "import_ram"
    )]
    console: Option<ConsoleVersion>,
    #[arg(
        long = "into-slot",
        value_name = "1|2|3",
        value_parser = clap::value_parser!(u8).range(1..=3),
        requires = "import_ram"
    )]
    into_slot: Option<u8>,
    #[arg(long = "set-sound")]
    set_sound: Option<SoundArg>,
    #[arg(long = "set-targeting")]
    set_targeting: Option<TargetingArg>,
    #[arg(long = "set-name", value_name = "NAME", requires = "slot")]
    set_name: Option<String>,
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn fields(&self) -> FieldSelection {
        FieldSelection {
            name: self.name,
            rupees: self.rupees,
            deaths: self.deaths,
            hearts: self.hearts,
            health: self.health,
            skulltulas: self.skulltulas,
            defense: self.defense,
            quest: self.quest,
            settings: self.settings,
        }
    }

    fn has_edits(&self) -> bool {
        self.import_ram.is_some()
            || self.set_sound.is_some()
            || self.set_targeting.is_some()
            || self.set_name.is_some()
    }

    /// 0-based slot selected with `--slot`.
    fn slot_index(&self) -> Option<usize> {
        self.slot.map(|slot| usize::from(slot) - 1)
    }
}

fn parse_console(raw: &str) -> Result<ConsoleVersion, String> {
    ConsoleVersion::from_name(raw).map_err(|e| e.message)
}

fn to_core_sound(arg: SoundArg) -> SoundMode {
    match arg {
        SoundArg::Stereo => SoundMode::Stereo,
        SoundArg::Mono => SoundMode::Mono,
        SoundArg::Headset => SoundMode::Headset,
        SoundArg::Surround => SoundMode::Surround,
    }
}

fn to_core_targeting(arg: TargetingArg) -> TargetingMode {
    match arg {
        TargetingArg::Switch => TargetingMode::Switch,
        TargetingArg::Hold => TargetingMode::Hold,
    }
}

fn open_session(cli: &Cli) -> anyhow::Result<Session> {
    let engine = Engine::new();
    let Some(path) = cli.path.as_ref() else {
        return Ok(engine.blank());
    };

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let session = engine
        .open_bytes(bytes)
        .with_context(|| format!("parsing save file {}", path.display()))?;
    debug!(
        "Loaded {} with {} checksum warning(s)",
        path.display(),
        session.load_warnings().len()
    );
    Ok(session)
}

fn apply_edits(cli: &Cli, session: &mut Session) -> anyhow::Result<()> {
    if let (Some(ram_path), Some(version), Some(into_slot)) =
        (cli.import_ram.as_ref(), cli.console, cli.into_slot)
    {
        let ram = fs::read(ram_path).with_context(|| format!("reading {}", ram_path.display()))?;
        session
            .import_ram(&ram, version, usize::from(into_slot) - 1)
            .context("importing RAM snapshot")?;
    }
    if let Some(sound) = cli.set_sound {
        session
            .set_sound_mode(to_core_sound(sound))
            .context("applying sound edit")?;
    }
    if let Some(targeting) = cli.set_targeting {
        session
            .set_targeting_mode(to_core_targeting(targeting))
            .context("applying targeting edit")?;
    }
    if let (Some(name), Some(slot)) = (cli.set_name.as_deref(), cli.slot_index()) {
        session
            .set_name(slot, name)
            .context("applying name edit")?;
    }
    Ok(())
}

fn write_output(session: &Session, out_path: &Path) -> anyhow::Result<()> {
    let bytes = session.to_bytes().context("creating edited save bytes")?;
    fs::write(out_path, bytes).with_context(|| format!("writing {}", out_path.display()))?;
    debug!("Wrote {}", out_path.display());
    Ok(())
}

/// Runs the command and returns the process exit status.
fn fallible_main(cli: &Cli) -> anyhow::Result<i32> {
    let fields = cli.fields();
    let mut session = open_session(cli)?;

    if cli.has_edits() {
        apply_edits(cli, &mut session)?;
        if let Some(out_path) = cli.output.as_ref() {
            write_output(&session, out_path)?;
        }
    }

    if cli.check {
        let mismatches = session.integrity().context("verifying checksums")?;
        if mismatches.is_empty() {
            println!("ok");
            return Ok(0);
        }
        for mismatch in &mismatches {
            println!("{mismatch}");
        }
        return Ok(EXIT_INTEGRITY);
    }

    if cli.json {
        let json = if fields.is_any_selected() {
            render_json_selected(&session, &fields, cli.slot_index())?
        } else {
            render_json_full(&session)?
        };
        let rendered =
            serde_json::to_string_pretty(&json).context("rendering JSON output")?;
        println!("{rendered}");
        return Ok(0);
    }

    if fields.is_any_selected() {
        for (key, value) in render_pairs(&session, &fields, cli.slot_index())? {
            println!("{key}={value}");
        }
        return Ok(0);
    }

    if let Some(out_path) = cli.output.as_ref() {
        println!("Wrote edited save to {}", out_path.display());
        return Ok(0);
    }

    print!("{}", render_text(&session)?);
    Ok(0)
}

fn main() {
    let subscriber = tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        );
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("cannot set default tracing subscriber: {err}");
    }

    let cli = Cli::parse();
    let has_edits = cli.has_edits();

    if has_edits && cli.output.is_none() {
        eprintln!("--set-* and --import-ram flags require --output <PATH>");
        process::exit(EXIT_USAGE);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one --set-* or --import-ram flag");
        process::exit(EXIT_USAGE);
    }

    match fallible_main(&cli) {
        Ok(0) => (),
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(EXIT_FAILURE);
        }
    }
}
