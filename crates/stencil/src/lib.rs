//! The `stencil` command.
//!
//! The binary is a thin shell around [`run`], which reads the data, merges
//! overrides, selects a section, renders the template and writes the
//! result. Stdin, the environment and stdout are parameters so the whole
//! command path can run in-process under test.

pub mod cli;
pub mod logging;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use stencil_input::{ContextBuilder, DataSource, FormatRegistry, StdinReader};
use stencil_render::{EnvReader, Renderer};

pub use cli::Cli;

/// Runs one invocation.
///
/// Nothing is written anywhere unless rendering succeeds. With
/// `--outfile`, the file is only created or replaced after that.
pub fn run<W: Write>(cli: &Cli, stdin: &dyn StdinReader, environ: impl EnvReader + 'static, stdout: &mut W) -> Result<()> {
    let registry = FormatRegistry::standard();
    let source = DataSource::from_arg(cli.data.as_deref());
    tracing::debug!(?source, format = %cli.format, "loading template data");

    let context = ContextBuilder::new(&registry)
        .format(cli.format.as_str())
        .defines(&cli.defines)
        .section(cli.section.as_deref())
        .recursive(cli.recursive)
        .build(&source, stdin)?;

    let template = absolute(&cli.template)?;
    let output = Renderer::new(cli.render_options())
        .environ(environ)
        .render_file(&template, &context)?;

    match &cli.outfile {
        Some(path) => {
            fs::write(path, output.as_bytes())
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = output.len(), "wrote output");
        }
        None => {
            stdout.write_all(output.as_bytes()).context("failed to write output")?;
            stdout.flush().context("failed to flush output")?;
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve the working directory")?;
    Ok(cwd.join(path))
}
