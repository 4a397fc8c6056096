//! Command-line definition and argument parsing for `minifind`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use filefind::{FindOptions, TraversalOrder};
use logging::VerbosityConfig;

pub(crate) const PROGRAM_NAME: &str = "minifind";

/// Parsed command produced by [`parse_args`].
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) targets: Vec<PathBuf>,
    pub(crate) options: FindOptions,
    pub(crate) verbosity: VerbosityConfig,
}

pub(crate) fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Print every path below the given roots, one per line.")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg_required_else_help(false)
        .override_usage("minifind [OPTIONS] <PATH>...")
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .help("Show this help message and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .help("Output version information and exit.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("depth-first")
                .long("depth-first")
                .short('d')
                .help("List a directory's contents before the directory itself.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("follow")
                .long("follow")
                .short('L')
                .help("Descend into directories reached through symbolic links.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cross-filesystems")
                .long("cross-filesystems")
                .short('x')
                .help("Descend into directories on other filesystems.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase diagnostic verbosity; may be repeated.")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .value_name("FLAGS")
                .help("Enable debug categories, e.g. dir2,dup or all.")
                .value_parser(clap::value_parser!(String))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("info")
                .long("info")
                .value_name("FLAGS")
                .help("Enable info categories, e.g. stats or skip2.")
                .value_parser(clap::value_parser!(String))
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("paths")
                .value_name("PATH")
                .num_args(0..)
                .action(ArgAction::Append)
                .value_parser(clap::value_parser!(OsString)),
        )
}

pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();

    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    let show_help = matches.get_flag("help");
    let show_version = matches.get_flag("version");

    let order = if matches.get_flag("depth-first") {
        TraversalOrder::DepthFirst
    } else {
        TraversalOrder::Flat
    };
    let options = FindOptions {
        order,
        follow_symlinks: matches.get_flag("follow"),
        cross_filesystems: matches.get_flag("cross-filesystems"),
    };

    let mut verbosity = VerbosityConfig::from_verbose_level(matches.get_count("verbose"));
    let debug = matches
        .remove_many::<String>("debug")
        .map(|values| values.collect::<Vec<_>>())
        .unwrap_or_default();
    for list in &debug {
        verbosity
            .apply_debug_flags(list)
            .map_err(|message| clap_command().error(ErrorKind::InvalidValue, message))?;
    }
    let info = matches
        .remove_many::<String>("info")
        .map(|values| values.collect::<Vec<_>>())
        .unwrap_or_default();
    for token in info.iter().flat_map(|list| list.split(',')) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        verbosity
            .apply_info_flag(token)
            .map_err(|message| clap_command().error(ErrorKind::InvalidValue, message))?;
    }

    let targets = matches
        .remove_many::<OsString>("paths")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    Ok(ParsedArgs {
        show_help,
        show_version,
        targets,
        options,
        verbosity,
    })
}

pub(crate) fn render_help() -> String {
    clap_command().render_help().to_string()
}

pub(crate) fn render_usage() -> String {
    clap_command().render_usage().to_string()
}
