use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, Subcommand};
use tagsuite::{
    dataset::write_sentences, decoder, features, Corpus, Evaluation, HiddenMarkovModel,
    MaxEntMarkovModel, Model, Result, Token,
};

/// Sequence tagging with Viterbi decoders
#[derive(Debug, Parser)]
#[command(version)]
struct Argv {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build an HMM tagger from labeled corpora and store it (MODEL)
    Train {
        /// write the model to a file (MODEL)
        #[arg(short, long, required = true, value_name = "MODEL")]
        model: PathBuf,
        /// labeled corpus files or directories
        #[arg(value_name = "CORPUS", required = true)]
        corpora: Vec<PathBuf>,
    },
    /// Assign part-of-speech tags to each FILE, writing FILE.out
    Tag {
        #[command(flatten)]
        args: TagArgs,
    },
    /// Write noun-group training events for a maxent trainer
    Features {
        /// write the events to a file (OUT)
        #[arg(short, long, required = true, value_name = "OUT")]
        output: PathBuf,
        /// write each distinct event once
        #[arg(short, long)]
        unique: bool,
        #[arg(value_name = "CORPUS", required = true)]
        corpora: Vec<PathBuf>,
    },
    /// Assign noun-group chunks to each FILE with a maxent model, writing FILE.out
    Chunk {
        #[command(flatten)]
        args: TagArgs,
    },
}

#[derive(Debug, clap::Args)]
struct TagArgs {
    /// read a model from a file (MODEL)
    #[arg(short, long, required = true, value_name = "MODEL")]
    model: PathBuf,
    /// report the performance of the model on the data
    #[arg(short = 't', long = "test")]
    evaluate: bool,
    /// suppress tagging results (useful for test mode)
    #[arg(short, long)]
    quiet: bool,
    /// number of decoding threads
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,
    #[arg(value_name = "FILE", required = true)]
    datasets: Vec<PathBuf>,
}

fn read_corpora(paths: &[PathBuf]) -> Result<Corpus> {
    let corpora = paths
        .iter()
        .map(Corpus::from_path)
        .collect::<Result<Vec<_>>>()?;
    Ok(Corpus::concat(corpora))
}

fn output_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".out");
    PathBuf::from(name)
}

fn run<M: Model>(model: &M, args: &TagArgs, reference: fn(&Token) -> Option<&str>) -> Result<()> {
    let tagger = model.decoder()?;
    let mut evaluation = Evaluation::default();
    for path in &args.datasets {
        let begin = Instant::now();
        let mut corpus = Corpus::from_path(path)?;
        decoder::tag_parallel(&tagger, corpus.sentences_mut(), args.threads)?;
        log::info!(
            "{}: {} sentences decoded in {:?}",
            path.display(),
            corpus.len(),
            begin.elapsed()
        );
        if args.evaluate {
            for sentence in corpus.sentences() {
                evaluation.accumulate_sentence(sentence, reference);
            }
        }
        if !args.quiet {
            let out = output_path(path);
            write_sentences(BufWriter::new(File::create(&out)?), corpus.sentences())?;
            log::info!("wrote {}", out.display());
        }
    }
    if args.evaluate {
        evaluation.evaluate();
        print!("{evaluation}");
    }
    Ok(())
}

fn execute(argv: Argv) -> Result<()> {
    match argv.command {
        Command::Train { model, corpora } => {
            let begin = Instant::now();
            let corpus = read_corpora(&corpora)?;
            let hmm = HiddenMarkovModel::train(&corpus)?;
            hmm.dump(&model)?;
            log::info!("{}: written, took {:?}", model.display(), begin.elapsed());
        }
        Command::Tag { args } => {
            let hmm = HiddenMarkovModel::from_path(&args.model)?;
            run(&hmm, &args, Token::tag)?;
        }
        Command::Features {
            output,
            unique,
            corpora,
        } => {
            let corpus = read_corpora(&corpora)?;
            let mut events = features::extract_corpus(&corpus);
            if unique {
                events = features::unique(events);
            }
            features::write_events(BufWriter::new(File::create(&output)?), &events)?;
            log::info!("{}: {} events", output.display(), events.len());
        }
        Command::Chunk { args } => {
            let memm = MaxEntMarkovModel::from_path(&args.model)?;
            run(&memm, &args, Token::chunk)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let argv = Argv::parse();
    log::debug!("{:?}", argv);
    match execute(argv) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
