use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process;

/// Translate a PROVOL-ONE source file into a standalone C program.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
  /// The source file to translate
  source_path: PathBuf,

  /// Write the generated program here instead of stdout
  #[arg(short, long)]
  output: Option<PathBuf>,

  /// Suppress the diagnostic trace
  #[arg(short, long)]
  quiet: bool,
}

fn main() {
  let cli = Cli::parse();

  let source = match fs::read_to_string(&cli.source_path) {
    Ok(source) => source,
    Err(err) => {
      eprintln!(
        "error reading source file '{}': {err}",
        cli.source_path.display()
      );
      process::exit(1);
    }
  };

  let translation = match provolc::translate(&source) {
    Ok(translation) => translation,
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  };

  if !cli.quiet {
    for note in &translation.trace {
      eprintln!("{note}");
    }
  }

  match cli.output {
    Some(path) => {
      if let Err(err) = fs::write(&path, &translation.program) {
        eprintln!("error writing '{}': {err}", path.display());
        process::exit(1);
      }
    }
    None => print!("{}", translation.program),
  }
}
