use std::error::Error;
use std::fs::File;
use std::io;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use gatekeeper::protocol::{format_cut, play, read_level};
use gatekeeper::referee::{Outcome, Referee};
use gatekeeper::{NodeId, TurnReport};

#[derive(Parser)]
#[command(name = "player")]
#[command(about = "Cut links so the adversary never reaches an exit")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer adversary positions on stdin with one cut per line on stdout
    Play {
        /// Describe every turn on stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Play a level file against an adversary heading for its nearest exit
    Simulate {
        /// Level file: the initialisation block of the protocol
        level: PathBuf,
        /// Node the adversary starts on
        #[arg(short, long)]
        start: usize,
        #[arg(long, default_value_t = Referee::DEFAULT_MAX_TURNS)]
        max_turns: usize,
        /// Describe every turn on stderr
        #[arg(short, long)]
        verbose: bool,
    },
}

fn describe(report: &TurnReport) {
    eprintln!(
        "[Interceptor] turn {}: cut {} for {:?} ({} expanded, {} promotions), now {}",
        report.turn,
        format_cut(&report.cut),
        report.threat,
        report.stats.expanded,
        report.stats.promotions,
        report.state,
    );
}

fn run(args: Args) -> Result<ExitCode, Box<dyn Error>> {
    match args.command {
        Command::Play { verbose } => {
            let interceptor = play(io::stdin().lock(), io::stdout().lock(), |report| if verbose { describe(report) })?;
            if verbose {
                eprintln!("[Interceptor] done after {} turns, {}", interceptor.turns(), interceptor.state());
            }

            Ok(ExitCode::SUCCESS)
        }
        Command::Simulate { level, start, max_turns, verbose } => {
            let network = read_level(BufReader::new(File::open(&level)?))?.network()?;
            if verbose {
                eprintln!("[Referee] {}: {} nodes, {} links, {} exits", level.display(), network.node_count(), network.edge_count(), network.exit_count());
            }

            let game = Referee::new(network, NodeId(start)).with_max_turns(max_turns).run()?;
            for report in game.reports.iter() {
                if verbose {
                    describe(report);
                }
                println!("{}", format_cut(&report.cut));
            }

            match game.outcome {
                Outcome::Contained => println!("{} after {} turns", game.outcome, game.reports.len()),
                Outcome::Escaped { exit } => println!("{} through {}", game.outcome, exit),
                Outcome::TurnLimit => println!("{} of {} reached", game.outcome, max_turns),
            }

            Ok(match game.outcome {
                Outcome::Contained => ExitCode::SUCCESS,
                Outcome::Escaped { .. } => ExitCode::from(1),
                Outcome::TurnLimit => ExitCode::from(2),
            })
        }
    }
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
