use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use soundshift::model::FeatureModel;
use soundshift::ruleset::Ruleset;
use tracing_subscriber::EnvFilter;

/// Apply a list of sound changes to a lexicon
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// File of macro definitions and rules, one per line
  #[arg(short, long)]
  pub rules: PathBuf,
  /// Words to transform, one per line. Read from stdin if omitted
  #[arg(short, long)]
  pub lexicon: Option<PathBuf>,
  /// Log compilation details
  #[arg(short, long)]
  pub verbose: bool,
  /// Print each word next to its output
  #[arg(short, long)]
  pub trace_words: bool,
}
impl Args {
  fn read_lexicon(&self) -> io::Result<String> {
    match &self.lexicon {
      Some(path) => fs::read_to_string(path),
      None => {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
      },
    }
  }
}

fn main() -> ExitCode {
  let args = Args::parse();
  let default = if args.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
  let rules = match fs::read_to_string(&args.rules) {
    Ok(text) => text,
    Err(e) => {
      eprintln!("{}: {e}", args.rules.display());
      return ExitCode::FAILURE;
    },
  };
  let ruleset = match Ruleset::parse(&rules, &FeatureModel::empty()) {
    Ok(set) => set,
    Err(e) => {
      eprintln!("{e}");
      return ExitCode::FAILURE;
    },
  };
  let lexicon = match args.read_lexicon() {
    Ok(text) => text,
    Err(e) => {
      eprintln!("failed to read lexicon: {e}");
      return ExitCode::FAILURE;
    },
  };
  let seg = ruleset.segmenter();
  let words = (lexicon.lines().map(str::trim))
    .filter(|l| !l.is_empty())
    .map(|l| seg.segment(l))
    .collect::<Vec<_>>();
  for (input, output) in words.iter().zip(ruleset.apply_lexicon(&words)) {
    if args.trace_words {
      println!("{input} -> {output}")
    } else {
      println!("{output}")
    }
  }
  ExitCode::SUCCESS
}
