use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Report, Result, WrapErr, eyre};

use schemalab::{Playground, UiOptions};

#[derive(Debug, Parser)]
#[command(
    name = "schemalab",
    version,
    about = "Live-edit JSON Schemas and preview the generated form"
)]
struct Cli {
    /// Initial schema text: file path or "-" for stdin
    #[arg(short = 's', long = "schema", value_name = "PATH")]
    schema: Option<String>,

    /// Initial UI schema text: file path or "-" for stdin
    #[arg(short = 'u', long = "ui-schema", value_name = "PATH")]
    ui_schema: Option<String>,

    /// Title shown above the form preview
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Write the final form data to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    output: Option<PathBuf>,

    /// Emit compact JSON rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Hide the key help in the footer
    #[arg(long = "no-help")]
    no_help: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if cli.schema.as_deref() == Some("-") && cli.ui_schema.as_deref() == Some("-") {
        return Err(eyre!(
            "cannot read schema and UI schema from stdin simultaneously"
        ));
    }

    let schema_text = cli.schema.as_deref().map(load_text).transpose()?;
    let ui_schema_text = cli.ui_schema.as_deref().map(load_text).transpose()?;

    let mut playground = Playground::new().with_options(UiOptions {
        show_help: !cli.no_help,
    });
    if let Some(text) = schema_text {
        playground = playground.with_schema_text(text);
    }
    if let Some(text) = ui_schema_text {
        playground = playground.with_ui_schema_text(text);
    }
    if let Some(title) = cli.title {
        playground = playground.with_title(title);
    }

    let data = playground.run().map_err(Report::msg)?;

    let rendered = if cli.no_pretty {
        serde_json::to_string(&data)?
    } else {
        serde_json::to_string_pretty(&data)?
    };

    match cli.output {
        Some(path) => {
            fs::write(&path, format!("{rendered}\n"))
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn load_text(spec: &str) -> Result<String> {
    if spec == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .wrap_err("failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(spec).wrap_err_with(|| format!("failed to read {spec}"))
    }
}
