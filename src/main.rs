use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use mdconvert::{Config, ConvertError, ConvertRequest, ConvertResponse, Format};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdconvert")]
#[command(about = "Convert Markdown to RTF, LaTeX, plain text, CSV, JSON, XML and more")]
struct Cli {
    /// Input Markdown file, or `-` to read stdin
    input: Option<PathBuf>,

    /// Markdown text to convert instead of reading a file
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,

    /// Output format (see --list-formats)
    #[arg(short = 't', long = "to", default_value = "text")]
    to: String,

    /// Write the result to this file instead of stdout. For a directory, the
    /// file is named after the input with the format's extension
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Document title for JSON, XML and standalone LaTeX/HTML
    #[arg(long)]
    title: Option<String>,

    /// TOML file layered over the built-in style configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit an RTF/LaTeX/HTML body without the document wrapper
    #[arg(long)]
    fragment: bool,

    /// Print the available output formats and exit
    #[arg(long)]
    list_formats: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mdconvert=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.list_formats {
        for format in Format::ALL {
            println!("{:<10} {}", format.name(), format.description());
        }
        return;
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> mdconvert::Result<()> {
    let format: Format = cli.to.parse()?;
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::compiled_default(),
    };

    let text = match (cli.text, &cli.input) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(read_input(path)?),
        (None, None) => None,
    };

    let output = cli
        .output
        .map(|path| output_path(path, cli.input.as_deref(), format));

    let request = ConvertRequest {
        text,
        format,
        title: cli.title,
        output,
        standalone: !cli.fragment,
    };

    match mdconvert::convert(request, &config)? {
        ConvertResponse::Inline { content, .. } => {
            print!("{content}");
            if !content.ends_with('\n') {
                println!();
            }
        }
        ConvertResponse::Saved(receipt) => println!("{receipt}"),
    }
    Ok(())
}

fn read_input(path: &Path) -> mdconvert::Result<String> {
    let io_error = |source: io::Error| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    };

    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(io_error)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(io_error)
    }
}

/// `-o` naming a directory saves `<input stem>.<extension>` inside it
/// (`output.<extension>` for stdin or `--text`).
fn output_path(path: PathBuf, input: Option<&Path>, format: Format) -> PathBuf {
    if !path.is_dir() {
        return path;
    }
    let stem = input
        .filter(|input| *input != Path::new("-"))
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.join(format!("{stem}.{}", format.extension()))
}
