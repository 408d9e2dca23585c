//! Command-line front-end for the platform. UI-level rules live here
//! rather than in the store: casting a vote is refused outside an active
//! window, and tallies are formatted for a terminal.

use std::fs;
use std::path::Path;
use std::thread;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::error;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::candidate::{CandidateUpdate, Category, NewCandidate};
use crate::model::status::{VotingState, VotingStatus};
use crate::platform::Platform;
use crate::store::FileStore;

const PROGRAM_NAME: &str = "electoral-platform";

const ABOUT_TEXT: &str = "Administer and vote in a demo electoral platform.

All state lives in a small file-backed key-value store; point several
invocations at the same storage directory to share it.

EXIT CODES:
     0: Success.
     1: Error (bad input, closed voting window, or storage failure).";

const CONFIG: &str = "CONFIG";
const CONFIG_HELP: &str = "Path to a TOML config file.\nDefaults to `electoral.toml` if present.";

const CANDIDATE_ID: &str = "CANDIDATE_ID";
const CATEGORY: &str = "CATEGORY";
const NAME: &str = "NAME";
const PARTY: &str = "PARTY";
const PROPOSALS: &str = "PROPOSALS";
const IMAGE_URL: &str = "IMAGE_URL";
const PRESIDENT: &str = "PRESIDENT";
const MAYOR: &str = "MAYOR";
const DEPUTY: &str = "DEPUTY";
const CSV_PATH: &str = "CSV_PATH";
const ROUNDS: &str = "ROUNDS";

/// Construct the CLI configuration.
pub fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(CONFIG)
                .long("config")
                .value_name("PATH")
                .help(CONFIG_HELP)
                .action(ArgAction::Set)
                .global(true),
        )
        .subcommand(
            Command::new("candidates")
                .about("Manage the candidate list")
                .subcommand_required(true)
                .subcommand(Command::new("list").about("List candidates by category"))
                .subcommand(
                    Command::new("add")
                        .about("Register a new candidate")
                        .arg(category_arg().required(true))
                        .arg(
                            Arg::new(NAME)
                                .long("name")
                                .required(true)
                                .action(ArgAction::Set),
                        )
                        .arg(
                            Arg::new(PARTY)
                                .long("party")
                                .required(true)
                                .action(ArgAction::Set),
                        )
                        .arg(
                            Arg::new(PROPOSALS)
                                .long("proposals")
                                .required(true)
                                .action(ArgAction::Set),
                        )
                        .arg(
                            Arg::new(IMAGE_URL)
                                .long("image")
                                .action(ArgAction::Set)
                                .default_value("/placeholder.svg"),
                        ),
                )
                .subcommand(
                    Command::new("update")
                        .about("Edit an existing candidate")
                        .arg(Arg::new(CANDIDATE_ID).required(true).action(ArgAction::Set))
                        .arg(Arg::new(NAME).long("name").action(ArgAction::Set))
                        .arg(Arg::new(PARTY).long("party").action(ArgAction::Set))
                        .arg(Arg::new(PROPOSALS).long("proposals").action(ArgAction::Set))
                        .arg(Arg::new(IMAGE_URL).long("image").action(ArgAction::Set))
                        .arg(category_arg()),
                )
                .subcommand(
                    Command::new("delete")
                        .about("Remove a candidate (their recorded votes become null)")
                        .arg(Arg::new(CANDIDATE_ID).required(true).action(ArgAction::Set)),
                ),
        )
        .subcommand(
            Command::new("vote")
                .about("Cast a ballot (only while the voting window is active)")
                .arg(
                    Arg::new(PRESIDENT)
                        .long("president")
                        .value_name("ID")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(MAYOR)
                        .long("mayor")
                        .value_name("ID")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(DEPUTY)
                        .long("deputy")
                        .value_name("ID")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(Command::new("status").about("Show the voting-window status"))
        .subcommand(Command::new("start").about("Open the voting window"))
        .subcommand(Command::new("end").about("Close the voting window now"))
        .subcommand(Command::new("reset").about("Discard all votes and reset the window"))
        .subcommand(Command::new("tally").about("Show per-category counts and leaders"))
        .subcommand(
            Command::new("import")
                .about("Bulk-import votes from a CSV file (president_id,mayor_id,deputy_id)")
                .arg(Arg::new(CSV_PATH).required(true).action(ArgAction::Set)),
        )
        .subcommand(
            Command::new("watch")
                .about("Re-display status and tally on an interval")
                .arg(
                    Arg::new(ROUNDS)
                        .long("rounds")
                        .value_name("N")
                        .help("Stop after N refreshes instead of running until interrupted")
                        .value_parser(clap::value_parser!(u64))
                        .action(ArgAction::Set),
                ),
        )
}

fn category_arg() -> Arg {
    Arg::new(CATEGORY)
        .long("category")
        .value_name("CATEGORY")
        .help("president, mayor or deputy")
        .action(ArgAction::Set)
}

/// Dispatch a parsed command line and return the exit code.
pub fn run(args: &ArgMatches) -> u8 {
    let config_path = args.get_one::<String>(CONFIG).map(Path::new);
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err}");
            return 1;
        }
    };
    let store = match FileStore::open(config.storage_dir()) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("Failed to open storage: {err}");
            return 1;
        }
    };
    let platform = Platform::with_window(store, config.voting_window());

    let result = match args.subcommand() {
        Some(("candidates", sub)) => candidates_cmd(&platform, sub),
        Some(("vote", sub)) => vote_cmd(&platform, sub),
        Some(("status", _)) => status_cmd(&platform),
        Some(("start", _)) => start_cmd(&platform),
        Some(("end", _)) => end_cmd(&platform),
        Some(("reset", _)) => reset_cmd(&platform),
        Some(("tally", _)) => tally_cmd(&platform),
        Some(("import", sub)) => import_cmd(&platform, sub),
        Some(("watch", sub)) => watch_cmd(&platform, &config, sub),
        _ => unreachable!("subcommand is required"),
    };

    match result {
        Ok(()) => 0,
        Err(err) => {
            error!("{err}");
            eprintln!("Error: {err}");
            1
        }
    }
}

fn candidates_cmd(platform: &Platform<FileStore>, args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("list", _)) => {
            for category in Category::ALL {
                println!("{category}:");
                for candidate in platform.candidates_in(category)? {
                    println!(
                        "  {:<16} {} ({})",
                        candidate.id, candidate.name, candidate.party
                    );
                }
            }
            Ok(())
        }
        Some(("add", sub)) => {
            let category = parse_category(sub.get_one::<String>(CATEGORY).expect("required"))?;
            let candidate = platform.add_candidate(NewCandidate {
                name: sub.get_one::<String>(NAME).expect("required").clone(),
                party: sub.get_one::<String>(PARTY).expect("required").clone(),
                proposals: sub.get_one::<String>(PROPOSALS).expect("required").clone(),
                image_url: sub.get_one::<String>(IMAGE_URL).expect("defaulted").clone(),
                category,
            })?;
            println!("Added candidate {} ({}).", candidate.id, candidate.name);
            Ok(())
        }
        Some(("update", sub)) => {
            let id = sub.get_one::<String>(CANDIDATE_ID).expect("required");
            let category = sub
                .get_one::<String>(CATEGORY)
                .map(|raw| parse_category(raw))
                .transpose()?;
            let candidate = platform.update_candidate(
                id,
                CandidateUpdate {
                    name: sub.get_one::<String>(NAME).cloned(),
                    party: sub.get_one::<String>(PARTY).cloned(),
                    proposals: sub.get_one::<String>(PROPOSALS).cloned(),
                    image_url: sub.get_one::<String>(IMAGE_URL).cloned(),
                    category,
                },
            )?;
            println!("Updated candidate {}.", candidate.id);
            Ok(())
        }
        Some(("delete", sub)) => {
            let id = sub.get_one::<String>(CANDIDATE_ID).expect("required");
            platform.delete_candidate(id)?;
            println!("Deleted candidate {id}.");
            Ok(())
        }
        _ => unreachable!("subcommand is required"),
    }
}

fn parse_category(raw: &str) -> Result<Category> {
    raw.parse().map_err(Error::invalid_candidate)
}

fn vote_cmd(platform: &Platform<FileStore>, args: &ArgMatches) -> Result<()> {
    let status = platform.voting_status()?;
    if status.state() != VotingState::Active {
        return Err(Error::invalid_transition("cast a vote", status.state()));
    }
    let vote = platform.cast_vote(
        args.get_one::<String>(PRESIDENT).map(String::as_str),
        args.get_one::<String>(MAYOR).map(String::as_str),
        args.get_one::<String>(DEPUTY).map(String::as_str),
    )?;
    println!("Vote {} recorded.", vote.id);
    Ok(())
}

fn status_cmd(platform: &Platform<FileStore>) -> Result<()> {
    let status = platform.voting_status()?;
    print_status(&status);
    Ok(())
}

fn print_status(status: &VotingStatus) {
    println!("Voting is {}.", status.state());
    if let Some(start) = status.start_time {
        println!("  Started: {start}");
    }
    if let Some(end) = status.end_time {
        match status.state() {
            VotingState::Active => println!("  Scheduled to close: {end}"),
            _ => println!("  Closed: {end}"),
        }
    }
}

fn start_cmd(platform: &Platform<FileStore>) -> Result<()> {
    let status = platform.start_voting()?;
    println!(
        "Voting window opened until {}.",
        status.end_time.expect("active window has an end time")
    );
    Ok(())
}

fn end_cmd(platform: &Platform<FileStore>) -> Result<()> {
    platform.end_voting()?;
    println!("Voting window closed.");
    Ok(())
}

fn reset_cmd(platform: &Platform<FileStore>) -> Result<()> {
    platform.reset()?;
    println!("System reset: votes discarded, window back to not started.");
    Ok(())
}

fn tally_cmd(platform: &Platform<FileStore>) -> Result<()> {
    let candidates = platform.candidates()?;
    let tally = platform.tally()?;
    println!("Total votes: {}", tally.total_votes());
    for category in Category::ALL {
        println!();
        println!("{category}:");
        for (name, count) in tally.display_rows(category, &candidates) {
            println!("  {name:<32} {count}");
        }
        let category_tally = tally.category(category);
        match category_tally.winner() {
            Some(id) => {
                let name = candidates
                    .iter()
                    .find(|c| &c.id == id)
                    .map(|c| c.name.as_str())
                    .unwrap_or(id);
                let leaders = category_tally.leaders();
                if leaders.len() > 1 {
                    println!("  Leading: {name} (tied {} ways)", leaders.len());
                } else {
                    println!("  Leading: {name}");
                }
            }
            None => println!("  No winner: no valid votes."),
        }
    }
    Ok(())
}

fn import_cmd(platform: &Platform<FileStore>, args: &ArgMatches) -> Result<()> {
    let path = args.get_one::<String>(CSV_PATH).expect("required");
    let csv_text = fs::read_to_string(path)?;
    let summary = platform.import_votes(&csv_text)?;
    println!("Imported {} votes.", summary.imported);
    if summary.null_votes > 0 {
        println!("{} ballots had blank or unknown fields (counted as null).", summary.null_votes);
    }
    if summary.invalid_rows > 0 {
        println!("{} invalid rows dropped.", summary.invalid_rows);
    }
    Ok(())
}

fn watch_cmd(platform: &Platform<FileStore>, config: &Config, args: &ArgMatches) -> Result<()> {
    // Interval re-reads: the store backend has no cross-process change
    // feed to subscribe to.
    let mut remaining = args.get_one::<u64>(ROUNDS).copied();
    loop {
        status_cmd(platform)?;
        tally_cmd(platform)?;
        println!("---");
        if let Some(rounds) = remaining.as_mut() {
            *rounds = rounds.saturating_sub(1);
            if *rounds == 0 {
                return Ok(());
            }
        }
        thread::sleep(config.watch_interval());
    }
}
