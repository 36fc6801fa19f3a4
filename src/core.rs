//! Command dispatch for the `apisnip` binary

use std::io::Write;
use std::path::Path;

use clap::{CommandFactory, Parser};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Args, Command, GenerateArgs, LogFormat, ServeArgs};
use crate::codegen::{generate_bundle_concurrent, generate_bundle_with, generate_format, CodegenOptions};
use crate::config::Config;
use crate::context::Environment;
use crate::errors::{ApisnipError, Result};
use crate::server::run_server;
use crate::spec::{normalize, normalize_json, project_rows, RawSpec, RequestSpec};
use crate::status::ExitStatus;

/// Main entry point for the CLI.
///
/// Loads configuration, parses arguments, sets up logging and dispatches to
/// the selected subcommand.
pub fn run(args: Vec<String>, mut env: Environment) -> ExitStatus {
    if let Some(name) = args.first() {
        if let Some(basename) = Path::new(name).file_stem() {
            env.program_name = basename.to_string_lossy().to_string();
        }
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}", e);
            Config::default()
        }
    };

    let merged_args = merge_default_options(args, &config);

    let parsed = match Args::try_parse_from(&merged_args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    init_logging(&parsed);
    debug!(config_dir = %config.config_dir.display(), "Configuration loaded");

    let debug = parsed.debug;
    match program(parsed, &config, &mut env) {
        Ok(status) => status,
        Err(e) => handle_error(e, debug),
    }
}

pub fn program(args: Args, config: &Config, env: &mut Environment) -> Result<ExitStatus> {
    match &args.command {
        Command::Generate(generate) => run_generate(generate, config, env),
        Command::Serve(serve) => run_serve(serve, config),
    }
}

fn run_generate(args: &GenerateArgs, config: &Config, env: &mut Environment) -> Result<ExitStatus> {
    let spec = read_spec(args, env)?;

    let mut options = config.codegen_options();
    if let Some(ref name) = args.collection_name {
        options.collection_name = name.clone();
    }

    let output = match args.format.single() {
        Some(format) => {
            debug!(format = format.name(), "Generating a single format");
            generate_format(format, &spec, &options)?
        }
        None => {
            let bundle = if args.concurrent {
                generate_bundle_concurrent(&spec, &options)?
            } else {
                generate_bundle_with(&spec, &options)?
            };
            serde_json::to_string_pretty(&bundle)?
        }
    };

    let mut stdout = env.stdout.lock();
    writeln!(stdout, "{}", output.trim_end_matches('\n'))?;
    stdout.flush()?;

    Ok(ExitStatus::Success)
}

/// Build the request spec from `--spec`, from flags, or from piped stdin
fn read_spec(args: &GenerateArgs, env: &mut Environment) -> Result<RequestSpec> {
    if let Some(ref path) = args.spec {
        let text = if path.as_os_str() == "-" {
            env.read_stdin()?
                .ok_or_else(|| ApisnipError::Argument("stdin is a terminal, nothing to read".to_string()))?
        } else {
            std::fs::read_to_string(path).map_err(|e| {
                ApisnipError::Argument(format!("cannot read spec file '{}': {}", path.display(), e))
            })?
        };
        return normalize_json(&text);
    }

    if let Some(ref url) = args.url {
        let raw = RawSpec {
            url: Some(url.clone()),
            method: Some(args.method.clone().unwrap_or_else(|| "GET".to_string())),
            headers: Some(project_rows(args.headers.iter().cloned())),
            query_params: Some(project_rows(args.query.iter().cloned())),
            body: args.body.clone().map(Value::String),
        };
        return normalize(raw);
    }

    match env.read_stdin()? {
        Some(text) => normalize_json(&text),
        None => Err(ApisnipError::Argument(format!(
            "no request spec given; use --spec FILE, --url URL, or pipe JSON into {}",
            env.program_name
        ))),
    }
}

fn run_serve(args: &ServeArgs, config: &Config) -> Result<ExitStatus> {
    let mut server_config = config.server.clone();
    if let Some(ref host) = args.host {
        server_config.host = host.clone();
    }
    if let Some(port) = args.port {
        server_config.port = port;
    }
    if args.no_cors {
        server_config.cors = false;
    }

    let options: CodegenOptions = config.codegen_options();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_server(&server_config, options))?;
    Ok(ExitStatus::Success)
}

/// Install the global tracing subscriber (stderr)
fn init_logging(args: &Args) {
    let default_level = if args.debug {
        "debug"
    } else if matches!(args.command, Command::Serve(_)) {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match args.log_format.unwrap_or_default() {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if let Err(e) = installed {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
}

/// Insert `[defaults] options` right after the subcommand name.
///
/// Each flag keeps the values that follow it (`--log-format json`). Flags the
/// chosen subcommand does not accept are skipped with a warning. Anything given
/// on the command line comes later and overrides a default.
fn merge_default_options(args: Vec<String>, config: &Config) -> Vec<String> {
    if config.default_options.is_empty() {
        return args;
    }

    let root = Args::command();
    let Some((position, subcommand)) = args.iter().enumerate().skip(1).find_map(|(i, arg)| {
        root.find_subcommand(arg.as_str()).map(|sub| (i, sub))
    }) else {
        return args;
    };

    let given: Vec<&str> = args[1..]
        .iter()
        .filter(|arg| arg.starts_with('-'))
        .filter_map(|arg| find_arg(&root, subcommand, arg))
        .map(|arg| arg.get_id().as_str())
        .collect();

    let mut defaults: Vec<String> = Vec::new();
    for group in option_groups(&config.default_options) {
        let flag = group[0].as_str();
        if !flag.starts_with('-') {
            eprintln!("Warning: Positional arguments in default_options are ignored: {:?}", group);
            continue;
        }
        match find_arg(&root, subcommand, flag) {
            Some(arg) if given.contains(&arg.get_id().as_str()) => {}
            Some(_) => defaults.extend(group.iter().cloned()),
            None => eprintln!(
                "Warning: default option {} does not apply to '{}' and is ignored",
                flag,
                subcommand.get_name()
            ),
        }
    }

    let mut merged = Vec::with_capacity(args.len() + defaults.len());
    merged.extend(args[..=position].iter().cloned());
    merged.extend(defaults);
    merged.extend(args[position + 1..].iter().cloned());
    merged
}

/// Split options into groups that each start at a flag.
///
/// Leading values without a flag form a group of their own.
fn option_groups(options: &[String]) -> Vec<&[String]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for (i, option) in options.iter().enumerate().skip(1) {
        if option.starts_with('-') {
            groups.push(&options[start..i]);
            start = i;
        }
    }
    if start < options.len() {
        groups.push(&options[start..]);
    }
    groups
}

/// The argument of the root command or `subcommand` named by `token`.
///
/// Accepts `--name`, `--name=value`, `-x` and `-xVALUE`.
fn find_arg<'a>(root: &'a clap::Command, subcommand: &'a clap::Command, token: &str) -> Option<&'a clap::Arg> {
    let matches = |arg: &&clap::Arg| -> bool {
        if let Some(long) = token.strip_prefix("--") {
            let name = long.split_once('=').map_or(long, |(name, _)| name);
            arg.get_long() == Some(name)
        } else {
            let short = token.strip_prefix('-').and_then(|s| s.chars().next());
            short.is_some() && arg.get_short() == short
        }
    };

    root.get_arguments()
        .find(matches)
        .or_else(|| subcommand.get_arguments().find(matches))
}

fn handle_error(error: ApisnipError, debug: bool) -> ExitStatus {
    if debug {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    ExitStatus::Error
}
