use std::io::{self, Write};
use std::process;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ruuid::{
    Format, SessionMessage, UuidKind, UuidSelector, Version, is_nil_uuid, parse_uuid,
    validate_uuid,
};

#[derive(Debug, Parser)]
#[command(name = "ruuid", version, about = "RFC4122 UUID generator for SIP session identifiers")]
struct Cli {
    /// Log at debug level. RUST_LOG takes precedence.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one UUID.
    Next(EmitOpts),
    /// Print several UUIDs, one per line.
    Stream {
        #[command(flatten)]
        emit: EmitOpts,
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
        count: u64,
    },
    /// Exit 0 if the argument is a UUID in any accepted style.
    Validate { id: String },
    /// Show the value, style, version and variant of a UUID.
    Parse {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Exit 0 if the argument is the nil UUID.
    IsNil { id: String },
    /// Generate and re-parse one UUID of every kind.
    Healthcheck {
        #[arg(long)]
        json: bool,
    },
    /// Measure generate-and-format throughput.
    Bench {
        #[command(flatten)]
        emit: EmitOpts,
        #[arg(long, default_value_t = 100_000)]
        count: usize,
    },
}

#[derive(Debug, Clone, Args)]
struct EmitOpts {
    /// nil, v4 or v5 (SIP namespace).
    #[arg(long, default_value = "v4")]
    kind: UuidKind,
    /// simple, hyphenated, urn or braced.
    #[arg(long, env = "RUUID_FORMAT", default_value = "hyphenated")]
    format: Format,
    /// Selector name such as `s`, `hf` or `ut`; replaces --format and picks
    /// the header tag for v5.
    #[arg(long)]
    selector: Option<String>,
    /// Name for v5, used as is.
    #[arg(long, conflicts_with = "call_id")]
    name: Option<String>,
    /// Call-ID for a v5 session name.
    #[arg(long)]
    call_id: Option<String>,
    #[arg(long, requires = "call_id")]
    from_tag: Option<String>,
    #[arg(long, requires = "call_id")]
    to_tag: Option<String>,
}

impl EmitOpts {
    fn selector(&self) -> UuidSelector {
        match &self.selector {
            Some(name) => UuidSelector::from_name(self.kind, name),
            None => UuidSelector::new(self.kind, self.format),
        }
    }

    fn message(&self) -> Option<SessionMessage> {
        let call_id = self.call_id.as_ref()?;
        Some(SessionMessage {
            call_id: call_id.clone(),
            from_tag: self.from_tag.clone(),
            to_tag: self.to_tag.clone(),
        })
    }

    fn render(&self, selector: &UuidSelector) -> Result<String, String> {
        let result = match (&self.name, self.message()) {
            (Some(name), _) => selector.render(Some(name.as_bytes())),
            (None, Some(msg)) => selector.render_for(&msg),
            (None, None) => selector.render(None),
        };
        result.map_err(|e| e.to_string())
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("warning: logging not initialised: {}", err);
    }
}

fn run_next(opts: &EmitOpts) -> Result<(), String> {
    let selector = opts.selector();
    println!("{}", opts.render(&selector)?);
    Ok(())
}

fn run_stream(opts: &EmitOpts, count: u64) -> Result<(), String> {
    let selector = opts.selector();
    let mut out = io::stdout().lock();
    for _ in 0..count {
        writeln!(out, "{}", opts.render(&selector)?).map_err(|e| e.to_string())?;
    }
    out.flush().map_err(|e| e.to_string())
}

fn run_validate(id: &str) -> Result<(), String> {
    let ok = validate_uuid(id);
    println!("{}", if ok { "true" } else { "false" });
    if ok {
        Ok(())
    } else {
        Err("invalid uuid".to_string())
    }
}

fn version_label(version: Option<Version>) -> &'static str {
    match version {
        Some(Version::Nil) => "nil",
        Some(Version::Random) => "4",
        Some(Version::Sha1) => "5",
        None => "other",
    }
}

fn run_parse(id: &str, json_out: bool) -> Result<(), String> {
    let parsed = parse_uuid(id).map_err(|e| e.to_string())?;
    let uuid = parsed.uuid;

    if json_out {
        let payload = json!({
            "raw": parsed.raw,
            "uuid": uuid,
            "format": parsed.format,
            "version": uuid.version_num(),
            "variant": format!("{:?}", uuid.get_variant()),
            "nil": uuid.is_nil(),
        });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!("raw={}", parsed.raw);
        println!("uuid={}", uuid);
        println!("format={}", parsed.format);
        println!("version={}", version_label(uuid.get_version()));
        println!("variant={:?}", uuid.get_variant());
    }

    Ok(())
}

fn run_is_nil(id: &str) -> Result<(), String> {
    let nil = is_nil_uuid(id).map_err(|e| e.to_string())?;
    println!("{}", if nil { "true" } else { "false" });
    if nil {
        Ok(())
    } else {
        Err("not the nil uuid".to_string())
    }
}

fn healthcheck_samples() -> Vec<(UuidSelector, bool)> {
    let msg = SessionMessage::new("healthcheck@ruuid").with_to_tag("ruuid");
    let mut samples = Vec::new();
    for kind in [UuidKind::Nil, UuidKind::V4, UuidKind::V5Sip] {
        for format in Format::ALL {
            let selector = UuidSelector::new(kind, format);
            let ok = selector
                .render_for(&msg)
                .and_then(|text| parse_uuid(&text))
                .map(|parsed| {
                    parsed.format == format && parsed.uuid.is_nil() == (kind == UuidKind::Nil)
                })
                .unwrap_or(false);
            debug!(%kind, style = %format, ok, "healthcheck sample");
            samples.push((selector, ok));
        }
    }
    samples
}

fn run_healthcheck(json_mode: bool) -> Result<(), String> {
    let samples = healthcheck_samples();
    let ok = samples.iter().all(|(_, ok)| *ok);

    if json_mode {
        let checks: Vec<_> = samples
            .iter()
            .map(|(sel, ok)| json!({ "kind": sel.kind, "format": sel.format, "ok": ok }))
            .collect();
        let payload = json!({ "ok": ok, "checks": checks });
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!(
            "ok={} checks={}",
            if ok { "true" } else { "false" },
            samples.len()
        );
    }

    if ok {
        Ok(())
    } else {
        Err("healthcheck failed".to_string())
    }
}

fn run_bench(opts: &EmitOpts, count: usize) -> Result<(), String> {
    let selector = opts.selector();
    let start = Instant::now();

    for _ in 0..count {
        let _ = opts.render(&selector)?;
    }

    let secs = start.elapsed().as_secs_f64().max(1e-9);
    let ips = count as f64 / secs;

    let payload = json!({
        "impl": "rust",
        "kind": selector.kind,
        "format": selector.format,
        "n": count,
        "seconds": secs,
        "ids_per_sec": ips,
    });
    println!(
        "{}",
        serde_json::to_string(&payload).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn run(command: &Command) -> Result<(), String> {
    match command {
        Command::Next(opts) => run_next(opts),
        Command::Stream { emit, count } => run_stream(emit, *count),
        Command::Validate { id } => run_validate(id),
        Command::Parse { id, json } => run_parse(id, *json),
        Command::IsNil { id } => run_is_nil(id),
        Command::Healthcheck { json } => run_healthcheck(*json),
        Command::Bench { emit, count } => run_bench(emit, *count),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(&cli.command) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
