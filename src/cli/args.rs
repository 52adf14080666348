use crate::driver::{SetupConfig, WorkloadConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Simulate concurrent transfers on a shared in-memory ledger
#[derive(Parser, Debug)]
#[command(name = "ledger-sim")]
#[command(about = "Simulate concurrent transfers on a shared in-memory ledger", long_about = None)]
pub struct CliArgs {
    /// Account setup CSV file (columns: id, balance)
    #[arg(
        long = "accounts",
        value_name = "FILE",
        help = "Load accounts from a CSV file instead of generating random balances"
    )]
    pub accounts_file: Option<PathBuf>,

    /// Number of randomly generated accounts
    #[arg(
        long = "account-count",
        value_name = "COUNT",
        help = "Number of accounts to generate (default: 5)"
    )]
    pub account_count: Option<u32>,

    /// Smallest random initial balance
    #[arg(
        long = "min-balance",
        value_name = "AMOUNT",
        help = "Smallest generated initial balance (default: 100)"
    )]
    pub min_balance: Option<u64>,

    /// Largest random initial balance
    #[arg(
        long = "max-balance",
        value_name = "AMOUNT",
        help = "Largest generated initial balance (default: 1000)"
    )]
    pub max_balance: Option<u64>,

    /// Scheduling strategy for the workers
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "threaded",
        help = "Worker scheduling: 'sequential', 'threaded' (OS threads) or 'async' (tokio tasks)"
    )]
    pub strategy: StrategyType,

    /// Number of concurrent workers
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of concurrent workers (default: 10)"
    )]
    pub workers: Option<usize>,

    /// Transfers attempted by each worker
    #[arg(
        long = "transfers",
        value_name = "COUNT",
        help = "Transfers attempted by each worker (default: 10)"
    )]
    pub transfers_per_worker: Option<usize>,

    /// Largest amount moved by a single transfer
    #[arg(
        long = "max-amount",
        value_name = "AMOUNT",
        help = "Largest amount moved by a single transfer (default: 100)"
    )]
    pub max_amount: Option<u64>,

    /// Runtime threads for the async strategy
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Runtime threads for the async strategy (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Seed for reproducible balances and workloads
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Where to write the audit log as CSV
    #[arg(long = "audit-output", value_name = "FILE")]
    pub audit_output: Option<PathBuf>,

    /// Log every audit record at info level once the run finishes
    #[arg(long = "log-audit")]
    pub log_audit: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Available worker scheduling strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sequential,
    Threaded,
    Async,
}

impl CliArgs {
    /// Create a SetupConfig from CLI arguments, using defaults for missing values
    pub fn to_setup_config(&self) -> SetupConfig {
        let default = SetupConfig::default();
        SetupConfig::new(
            self.account_count.unwrap_or(default.account_count),
            self.min_balance.unwrap_or(default.min_initial_balance),
            self.max_balance.unwrap_or(default.max_initial_balance),
            self.seed,
        )
    }

    /// Create a WorkloadConfig from CLI arguments, using defaults for missing values
    ///
    /// The workload seed is offset from the setup seed so the two streams differ.
    pub fn to_workload_config(&self) -> WorkloadConfig {
        let default = WorkloadConfig::default();
        WorkloadConfig::new(
            self.workers.unwrap_or(default.workers),
            self.transfers_per_worker
                .unwrap_or(default.transfers_per_worker),
            self.max_amount.unwrap_or(default.max_amount),
            self.seed.map(|seed| seed.wrapping_add(1)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program"], StrategyType::Threaded)]
    #[case::explicit_sequential(&["program", "--strategy", "sequential"], StrategyType::Sequential)]
    #[case::explicit_threaded(&["program", "--strategy", "threaded"], StrategyType::Threaded)]
    #[case::explicit_async(&["program", "--strategy", "async"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::no_options(&["program"], 10, 10, 100)]
    #[case::workers(&["program", "--workers", "4"], 4, 10, 100)]
    #[case::transfers(&["program", "--transfers", "1000"], 10, 1000, 100)]
    #[case::max_amount(&["program", "--max-amount", "5"], 10, 10, 5)]
    #[case::zero_workers_fall_back(&["program", "--workers", "0"], 10, 10, 100)]
    fn test_workload_config_conversion(
        #[case] args: &[&str],
        #[case] expected_workers: usize,
        #[case] expected_transfers: usize,
        #[case] expected_max_amount: u64,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_workload_config();

        assert_eq!(config.workers, expected_workers);
        assert_eq!(config.transfers_per_worker, expected_transfers);
        assert_eq!(config.max_amount, expected_max_amount);
    }

    #[rstest]
    #[case::defaults(&["program"], 5, 100, 1000)]
    #[case::custom(
        &["program", "--account-count", "3", "--min-balance", "10", "--max-balance", "20"],
        3,
        10,
        20
    )]
    fn test_setup_config_conversion(
        #[case] args: &[&str],
        #[case] expected_count: u32,
        #[case] expected_min: u64,
        #[case] expected_max: u64,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_setup_config();

        assert_eq!(config.account_count, expected_count);
        assert_eq!(config.min_initial_balance, expected_min);
        assert_eq!(config.max_initial_balance, expected_max);
    }

    #[test]
    fn test_seed_feeds_both_configs() {
        let parsed = CliArgs::try_parse_from(["program", "--seed", "7"]).unwrap();
        assert_eq!(parsed.to_setup_config().seed, Some(7));
        assert_eq!(parsed.to_workload_config().seed, Some(8));
    }

    #[test]
    fn test_file_options() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--accounts",
            "accounts.csv",
            "--audit-output",
            "audit.csv",
        ])
        .unwrap();
        assert_eq!(parsed.accounts_file, Some(PathBuf::from("accounts.csv")));
        assert_eq!(parsed.audit_output, Some(PathBuf::from("audit.csv")));
        assert_eq!(parsed.log_level, "info");
        assert!(!parsed.log_audit);
    }

    #[test]
    fn test_log_audit_flag() {
        let parsed = CliArgs::try_parse_from(["program", "--log-audit"]).unwrap();
        assert!(parsed.log_audit);
    }

    #[rstest]
    #[case::invalid_strategy(&["program", "--strategy", "invalid"])]
    #[case::negative_workers(&["program", "--workers", "-1"])]
    #[case::non_numeric_seed(&["program", "--seed", "abc"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
