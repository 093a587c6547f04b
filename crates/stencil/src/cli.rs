//! Command-line definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use stencil_render::{Delimiters, NewlineSequence, RenderOptions, DEFAULT_EXTENSIONS};

/// Render a Jinja template against structured data.
///
/// DATA is a file, a directory of files to merge, or `-` for stdin (the
/// default). Its format is detected from the file extension unless
/// `--format` says otherwise.
#[derive(Debug, Parser)]
#[command(name = "stencil", version)]
pub struct Cli {
    /// Template file to render
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Data file or directory; `-` reads stdin
    #[arg(value_name = "DATA")]
    pub data: Option<String>,

    /// Data format: auto, json, yaml, yml, ini, toml, xml, env, querystring, hjson or json5
    #[arg(short, long, default_value = "auto", value_name = "FORMAT")]
    pub format: String,

    /// Set a template variable; dotted keys nest
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// Render only this top-level section of the data
    #[arg(short, long, value_name = "NAME")]
    pub section: Option<String>,

    /// Fail on undefined variables
    #[arg(long)]
    pub strict: bool,

    /// Write output here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub outfile: Option<PathBuf>,

    /// Load an extension (repeatable)
    #[arg(short = 'e', long = "extension", value_name = "REF")]
    pub extensions: Vec<String>,

    /// Skip the built-in base64 and json extensions
    #[arg(long)]
    pub no_default_extensions: bool,

    /// Extra template directory (repeatable)
    #[arg(short = 'I', long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Recurse into subdirectories of a data directory
    #[arg(short, long)]
    pub recursive: bool,

    #[arg(long, value_name = "STR")]
    pub block_start: Option<String>,
    #[arg(long, value_name = "STR")]
    pub block_end: Option<String>,
    #[arg(long, value_name = "STR")]
    pub variable_start: Option<String>,
    #[arg(long, value_name = "STR")]
    pub variable_end: Option<String>,
    #[arg(long, value_name = "STR")]
    pub comment_start: Option<String>,
    #[arg(long, value_name = "STR")]
    pub comment_end: Option<String>,
    #[arg(long, value_name = "STR")]
    pub line_statement_prefix: Option<String>,
    #[arg(long, value_name = "STR")]
    pub line_comment_prefix: Option<String>,

    /// Remove the first newline after a block tag
    #[arg(long)]
    pub trim_blocks: bool,

    /// Strip whitespace before a block tag on its line
    #[arg(long)]
    pub lstrip_blocks: bool,

    /// Keep the template's final newline
    #[arg(long)]
    pub keep_trailing_newline: bool,

    /// Escape HTML in rendered values
    #[arg(long, overrides_with = "no_autoescape")]
    pub autoescape: bool,

    /// Never escape rendered values
    #[arg(long, overrides_with = "autoescape")]
    pub no_autoescape: bool,

    /// Line ending for the output
    #[arg(long, value_enum, value_name = "SEQ")]
    pub newline_sequence: Option<NewlineArg>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NewlineArg {
    Lf,
    Crlf,
    Cr,
}

impl From<NewlineArg> for NewlineSequence {
    fn from(arg: NewlineArg) -> Self {
        match arg {
            NewlineArg::Lf => NewlineSequence::Lf,
            NewlineArg::Crlf => NewlineSequence::CrLf,
            NewlineArg::Cr => NewlineSequence::Cr,
        }
    }
}

/// Flags that only matter when given.
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl Cli {
    pub fn autoescape(&self) -> Option<bool> {
        match (self.autoescape, self.no_autoescape) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }

    /// Extension references in installation order, defaults first.
    pub fn extension_refs(&self) -> Vec<String> {
        let defaults = if self.no_default_extensions {
            &[][..]
        } else {
            DEFAULT_EXTENSIONS
        };
        defaults
            .iter()
            .map(|s| s.to_string())
            .chain(self.extensions.iter().cloned())
            .collect()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            strict: self.strict,
            delimiters: Delimiters {
                block_start: self.block_start.clone(),
                block_end: self.block_end.clone(),
                variable_start: self.variable_start.clone(),
                variable_end: self.variable_end.clone(),
                comment_start: self.comment_start.clone(),
                comment_end: self.comment_end.clone(),
                line_statement_prefix: self.line_statement_prefix.clone(),
                line_comment_prefix: self.line_comment_prefix.clone(),
            },
            trim_blocks: flag(self.trim_blocks),
            lstrip_blocks: flag(self.lstrip_blocks),
            keep_trailing_newline: flag(self.keep_trailing_newline),
            autoescape: self.autoescape(),
            newline_sequence: self.newline_sequence.map(Into::into),
            search_paths: self.search_paths.clone(),
            extensions: self.extension_refs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("stencil").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = parse(&["page.j2"]);
        assert_eq!(cli.format, "auto");
        assert_eq!(cli.data, None);
        let options = cli.render_options();
        assert!(!options.strict);
        assert_eq!(options.trim_blocks, None);
        assert_eq!(options.autoescape, None);
        assert_eq!(options.extensions, ["stencil.ext.base64", "stencil.ext.json"]);
    }

    #[test]
    fn repeatable_flags_collect() {
        let cli = parse(&["page.j2", "data.json", "-D", "a=1", "-Db.c=2", "-e", "x:y", "-I", "inc", "-vv"]);
        assert_eq!(cli.defines, ["a=1", "b.c=2"]);
        assert_eq!(cli.data.as_deref(), Some("data.json"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.render_options().extensions,
            ["stencil.ext.base64", "stencil.ext.json", "x:y"]
        );
    }

    #[test]
    fn defaults_can_be_dropped() {
        let cli = parse(&["page.j2", "--no-default-extensions", "-e", "json"]);
        assert_eq!(cli.extension_refs(), ["json"]);
    }

    #[test]
    fn autoescape_last_flag_wins() {
        assert_eq!(parse(&["t", "--autoescape"]).autoescape(), Some(true));
        assert_eq!(parse(&["t", "--no-autoescape"]).autoescape(), Some(false));
        assert_eq!(parse(&["t", "--autoescape", "--no-autoescape"]).autoescape(), Some(false));
        assert_eq!(parse(&["t", "--no-autoescape", "--autoescape"]).autoescape(), Some(true));
    }

    #[test]
    fn engine_knobs_map_to_options() {
        let cli = parse(&[
            "t",
            "--trim-blocks",
            "--variable-start",
            "<<",
            "--newline-sequence",
            "crlf",
        ]);
        let options = cli.render_options();
        assert_eq!(options.trim_blocks, Some(true));
        assert_eq!(options.lstrip_blocks, None);
        assert_eq!(options.delimiters.variable_start.as_deref(), Some("<<"));
        assert_eq!(options.newline_sequence, Some(NewlineSequence::CrLf));
    }

    #[test]
    fn unknown_newline_sequence_is_rejected() {
        let result = Cli::try_parse_from(["stencil", "t", "--newline-sequence", "tab"]);
        assert!(result.is_err());
    }
}
