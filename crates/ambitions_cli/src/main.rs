use std::path::PathBuf;
use std::process;

use ambitions_core::config::{SAVES_DIR_ENV, SaveDirs, saves_dir_override};
use ambitions_core::core_api::{EditRequest, Engine};
use ambitions_core::scan::scan_saves;
use ambitions_core::schema::FieldId;
use ambitions_render::{
    TextRenderOptions, render_edit_report_json, render_edit_report_text, render_inspection_json,
    render_inspection_text, render_save_list_json, render_save_list_text,
};
use clap::{ArgAction, Parser};
use serde_json::Value as JsonValue;

const NO_EDITS_HINT: &str =
    "No changes requested. Supply at least one of --money, --energy, --networth.";

/// Edit Money, Energy and NetWorth in a Big Ambitions .hsg save.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.hsg", required_unless_present = "list")]
    path: Option<PathBuf>,
    /// Destination file (default: overwrite SAVE).
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    #[arg(short, long, allow_hyphen_values = true)]
    money: Option<f32>,
    #[arg(short, long, allow_hyphen_values = true)]
    energy: Option<f32>,
    #[arg(short = 'n', long = "networth", allow_hyphen_values = true)]
    net_worth: Option<f32>,
    /// Do not create SAVE.bak when overwriting in place.
    #[arg(long = "no-backup")]
    no_backup: bool,
    /// Print current values without editing.
    #[arg(long = "read-only", conflicts_with_all = ["output", "money", "energy", "net_worth"])]
    read_only: bool,
    /// List .hsg files under the save directory.
    #[arg(
        long,
        conflicts_with_all = [
            "path", "output", "money", "energy", "net_worth", "no_backup", "read_only",
        ]
    )]
    list: bool,
    /// Save directory to list (default: $AMBITIONS_SAVES_DIR, then SaveGames).
    #[arg(long = "saves-dir", value_name = "DIR", requires = "list")]
    saves_dir: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    /// Increase log output (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = TextRenderOptions {
        verbose: cli.verbose > 0,
    };

    if cli.list {
        run_list(&cli);
        return;
    }

    let Some(path) = cli.path.clone() else {
        eprintln!("A save file path is required");
        process::exit(2);
    };

    if !path.is_file() {
        eprintln!("Error: save file not found: {}", path.display());
        process::exit(1);
    }

    let engine = Engine::new();

    if cli.read_only {
        let inspection = engine.inspect(&path).unwrap_or_else(|e| {
            eprintln!("Error reading {}: {e}", path.display());
            process::exit(1);
        });
        if cli.json {
            print_json(&render_inspection_json(&inspection));
        } else {
            print!("{}", render_inspection_text(&inspection, options));
        }
        return;
    }

    let mut request = EditRequest::new(&path)
        .with_backup(!cli.no_backup)
        .set_opt(FieldId::Money, cli.money)
        .set_opt(FieldId::Energy, cli.energy)
        .set_opt(FieldId::NetWorth, cli.net_worth);
    if let Some(output) = &cli.output {
        request = request.with_output(output);
    }

    let report = engine.edit(&request).unwrap_or_else(|e| {
        eprintln!("Error saving {}: {e}", request.output_path().display());
        process::exit(1);
    });

    if cli.json {
        print_json(&render_edit_report_json(&report));
        return;
    }
    if !report.written {
        println!("{NO_EDITS_HINT}");
        return;
    }
    print!("{}", render_edit_report_text(&report, options));
}

fn run_list(cli: &Cli) {
    let dir = cli
        .saves_dir
        .clone()
        .or_else(saves_dir_override)
        .or_else(|| SaveDirs::from_env().and_then(|dirs| dirs.search_dir()));
    let Some(dir) = dir else {
        eprintln!("Error: game save folder not found; pass --saves-dir or set {SAVES_DIR_ENV}");
        process::exit(1);
    };

    let entries = scan_saves(&dir).unwrap_or_else(|e| {
        eprintln!("Error scanning {}: {e}", dir.display());
        process::exit(1);
    });

    let label = dir.display().to_string();
    if cli.json {
        print_json(&render_save_list_json(&label, &entries));
    } else {
        print!("{}", render_save_list_text(&label, &entries));
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}
