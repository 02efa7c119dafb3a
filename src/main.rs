//! Ethereum Vanity Address Generator CLI
//!
//! Usage:
//!   web3-vanity --address-start dead                 # address starting 0xdead
//!   web3-vanity --address-start ab cd --address-end ff -n 5
//!   web3-vanity --address-start cafe --use-seed-phrase

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use web3_vanity::{AddressIndex, Config, PatternSet, PoolEvent, SearchPool, VanityMatch};

fn main() {
    let config = Config::parse();

    init_logging(config.verbose);

    // Validate configuration before any compute is spent
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    }

    let patterns = PatternSet::new(&config.address_starts, &config.address_ends);
    let index = AddressIndex::load(&config.address_file);

    print_banner(&config, &patterns, &index);

    let pool = SearchPool::new(
        config.worker_count(),
        config.number_of_addresses,
        patterns,
        index,
        config.generation_mode(),
    );

    // Set up ctrl-c handler
    ctrlc_handler(pool.stop_flag_clone());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let report_interval = Duration::from_secs(config.report_interval);
    let mut found = 0u64;
    let mut failed = false;

    // Drain until every worker has exited: workers stop themselves at
    // the quota, and may deliver a bounded overshoot past it.
    loop {
        match pool.next_event(report_interval) {
            PoolEvent::Match(result) => {
                found += 1;
                print_result(&result, found);
            }
            PoolEvent::Failed(err) => {
                eprintln!("Worker failure: {}", err);
                failed = true;
            }
            PoolEvent::Timeout => print_progress(&pool),
            PoolEvent::Finished => break,
        }
    }

    if found >= config.number_of_addresses {
        println!("Target reached! Found {} address(es).", found);
    } else if pool.is_stopped() && !failed {
        println!("Stopped by user.");
    }

    // Print final stats
    println!("\n--- Final Statistics ---");
    println!("Total keys generated: {}", format_number(pool.total_keys()));
    println!("Total matches found:  {}", pool.total_matches());
    println!("Time elapsed:         {:.2}s", pool.elapsed().as_secs_f64());
    println!(
        "Average speed:        {}/s",
        format_number(pool.keys_per_second() as u64)
    );

    pool.join();

    if failed {
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_banner(config: &Config, patterns: &PatternSet, index: &AddressIndex) {
    println!("Web3 Vanity Address Generator");
    println!("=============================");
    println!("Address starts: {{{}}}", patterns.starts().join(", "));
    println!("Address ends:   {{{}}}", patterns.ends().join(", "));
    println!("Difficulty:     {}", patterns.difficulty_description());
    println!("Target:         {} address(es)", config.number_of_addresses);
    if config.use_seed_phrase {
        println!("Seed phrase:    enabled ({} words)", config.seed_phrase_words);
    } else {
        println!("Seed phrase:    disabled");
    }
    if !index.is_empty() {
        println!("Known list:     {} address(es)", index.len());
    }
    println!("Workers:        {}", config.worker_count());
    println!();
}

fn print_result(result: &VanityMatch, index: u64) {
    if result.known_collision {
        println!("{}", "|".repeat(100));
        println!("Generated address already exists in the known-address list!");
    }
    println!("=== Match #{} (worker {}) ===", index, result.worker_id);
    println!("Address:      {}", result.address);
    println!("Private Key:  {}", result.private_key);
    if let Some(phrase) = &result.mnemonic {
        println!("Seed Phrase:  {}", phrase);
    }
    if result.known_collision {
        println!("{}", "|".repeat(100));
    }
    println!();
}

fn print_progress(pool: &SearchPool) {
    println!(
        "[{:>4}s] Generated {} keys ({}/s), {}/{} match(es)",
        pool.elapsed().as_secs(),
        format_number(pool.total_keys()),
        format_number(pool.keys_per_second() as u64),
        pool.matched_count(),
        pool.target()
    );
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn ctrlc_handler(stop_flag: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        stop_flag.store(true, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");
}
