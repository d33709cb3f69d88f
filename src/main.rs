mod cli;
mod config;
mod printer;
mod process;
mod render;
mod results;
mod utils;

use std::path::Path;

use anyhow::{Context, Result};
use config::Config;
use printer::TextPrinter;
use process::{InvokeError, SearchPath};
use render::RenderOptions;
use results::RunTree;
use tracing::{debug, warn};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();

    if args.list_labels {
        print!("{}", cli::label_listing());
        return Ok(());
    }

    // Wrong number of labels is a help request, not an error
    if !args.has_valid_arity() {
        let program = std::env::args().next().unwrap_or_else(|| "dynsys-demo".to_string());
        println!("{}", cli::usage_text(&program));
        return Ok(());
    }

    // CLI flags override config
    let mut cfg = Config::load();
    debug!(path = %cfg.config_path.display(), "config loaded");
    if let Some(dir) = &args.output_dir {
        cfg.set("DYNSYS_OUTPUT_DIR", dir.as_str());
    }
    if let Some(dir) = &args.bin_dir {
        cfg.set("DYNSYS_BIN_DIR", dir.as_str());
    }
    if let Some(name) = &args.executable {
        cfg.set("DYNSYS_EXECUTABLE", name.as_str());
    }
    if let Some(dir) = &args.plot_dir {
        cfg.set("DYNSYS_PLOT_DIR", dir.as_str());
    }
    let print_command = !args.quiet && cfg.get_bool("DYNSYS_PRINT_COMMAND");

    let output_dir = cfg.output_dir();
    let arguments = cli::demo_arguments(&output_dir, &args.labels);

    println!("{}", printer::RULE);
    let outcome = match &args.binary {
        Some(path) => process::execute_binary(Path::new(path), &arguments, print_command),
        None => {
            let search = SearchPath::current_dir_first([cfg.bin_dir()]);
            process::execute_binary_with_directories(
                &search,
                &cfg.executable(),
                &arguments,
                print_command,
            )
        }
    };
    let invocation = match outcome {
        Ok(inv) => inv,
        Err(err @ InvokeError::MissingExecutable { .. }) => {
            let msg = printer::missing_executable_message(&err.to_string());
            TextPrinter::new("red").print(&msg);
            std::process::exit(-1);
        }
        Err(err) => return Err(err.into()),
    };
    if !invocation.success() {
        warn!(command = %invocation.command, code = ?invocation.exit_code, "demo binary failed, plotting whatever it wrote");
    }

    let opts = RenderOptions { plot_dir: cfg.plot_dir(), size: cfg.plot_size() };
    let written = render::render_run_tree(&RunTree::new(&output_dir), &args.labels, &opts)
        .with_context(|| format!("plotting results in '{}'", output_dir))?;

    let saved = TextPrinter::new("green");
    for path in &written {
        saved.print(&format!("Saved {}", path.display()));
    }
    Ok(())
}
