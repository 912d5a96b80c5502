//! Command-line interface for ssr2templ
//!
//! Usage:
//!   ssr2templ build --in `<dir>` --out `<dir>` [--config `<file>`] [--dialect `<d>`]  - Build every document
//!   ssr2templ inspect `<file>` [--format `<format>`] [--dialect `<d>`]              - Print one document's result
//!   ssr2templ list-formats                                                          - List inspect formats

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use ssr2templ::build::{build, BuildOptions};
use ssr2templ::config::{Loader, Ssr2TemplConfig, LOCAL_CONFIG_FILE};
use ssr2templ::formats::{package_name, FormatRegistry, GoStructsFormat};
use ssr2templ::{logging, Converter, Error};
use std::path::{Path, PathBuf};

/// Inspect format printing the rendered template rather than the schema
const TEMPLATE_FORMAT: &str = "template";

#[tokio::main]
async fn main() {
    let dialect_arg = || {
        Arg::new("dialect")
            .long("dialect")
            .short('d')
            .help("Template dialect (overrides the configuration)")
            .value_parser(["generic", "templ"])
    };

    let matches = Command::new("ssr2templ")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turns marker-annotated server-rendered HTML into templ components")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Convert every document below a directory")
                .arg(
                    Arg::new("in")
                        .long("in")
                        .help("Directory holding the server-rendered documents")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .help("Directory the component packages are written to")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(dialect_arg()),
        )
        .subcommand(
            Command::new("inspect")
                .about("Convert one document and print the result")
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'template', 'schema-json', 'go-structs')")
                        .default_value(TEMPLATE_FORMAT),
                )
                .arg(dialect_arg()),
        )
        .subcommand(Command::new("list-formats").about("List available inspect formats"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("build", build_matches)) => {
            logging::init(build_matches.get_count("verbose"));
            handle_build_command(build_matches).await
        }
        Some(("inspect", inspect_matches)) => {
            logging::init(inspect_matches.get_count("verbose"));
            handle_inspect_command(inspect_matches)
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
            Ok(())
        }
        _ => unreachable!(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Defaults, then `./ssr2templ.toml`, then `--config`, then `--dialect`
fn load_config(matches: &ArgMatches, explicit: Option<&PathBuf>) -> Result<Ssr2TemplConfig, Error> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG_FILE);
    if let Some(path) = explicit {
        loader = loader.with_file(path);
    }
    if let Some(dialect) = matches.get_one::<String>("dialect") {
        loader = loader.set_override("template.dialect", dialect.as_str())?;
    }
    Ok(loader.build()?)
}

/// Handle the build command
async fn handle_build_command(matches: &ArgMatches) -> Result<(), Error> {
    let config = load_config(matches, matches.get_one::<PathBuf>("config"))?;
    let options = BuildOptions {
        input_dir: matches
            .get_one::<PathBuf>("in")
            .cloned()
            .unwrap_or_default(),
        output_dir: matches
            .get_one::<PathBuf>("out")
            .cloned()
            .unwrap_or_default(),
        config,
    };

    let built = build(options).await?;
    for document in &built {
        println!("{}", document.template.display());
        println!("{}", document.declarations.display());
    }
    Ok(())
}

/// Handle the inspect command
fn handle_inspect_command(matches: &ArgMatches) -> Result<(), Error> {
    let path = matches
        .get_one::<PathBuf>("path")
        .map(PathBuf::as_path)
        .unwrap_or(Path::new(""));
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or(TEMPLATE_FORMAT);

    let config = load_config(matches, None)?;
    let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let conversion = Converter::from_config(&config.template)
        .convert(&source)
        .map_err(|e| e.in_document(path))?;

    if format == TEMPLATE_FORMAT {
        print!("{}", conversion.template);
        return Ok(());
    }

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let package = package_name(&stem);
    let mut registry = FormatRegistry::with_defaults();
    registry.register(GoStructsFormat::new(package.clone(), package));

    print!("{}", registry.serialize(&conversion.schema, format)?);
    Ok(())
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available inspect formats:\n");
    println!("  {TEMPLATE_FORMAT}");
    println!("    Rewritten document as template source");
    for name in registry.list_formats() {
        println!("  {name}");
        if let Ok(format) = registry.get(&name) {
            println!("    {}", format.description());
        }
    }
}
