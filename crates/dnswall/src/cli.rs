use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dnswall_lib::{DEFAULT_CAPACITY, MAX_CAPACITY};

#[derive(Parser)]
#[command(version, name = "dnswall")]
pub struct Args {
    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check whether addresses may be handed out in answers for external names
    Check {
        #[arg(value_name = "ADDR", required = true)]
        addresses: Vec<IpAddr>,
    },
    /// Run a synthetic query workload against a query record pool
    Exercise {
        #[arg(long, value_name = "RECORDS", default_value_t = DEFAULT_CAPACITY as u32, value_parser = clap::value_parser!(u32).range(1..=MAX_CAPACITY as i64))]
        capacity: u32,
        #[arg(short('n'), long, value_name = "QUERIES", default_value_t = 100_000)]
        queries: u32,
        #[arg(short('w'), long, value_name = "WORKERS", default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=64))]
        workers: u8,
        /// Share of queries that receive an answer, the rest are left for eviction
        #[arg(long, value_name = "PERCENT", default_value_t = 90, value_parser = clap::value_parser!(u8).range(0..=100))]
        answered_percent: u8,
        /// How many queries each worker keeps in flight before an answer arrives
        #[arg(long, value_name = "QUERIES", default_value_t = 32, value_parser = clap::value_parser!(u16).range(1..))]
        in_flight: u16,
    },
}
