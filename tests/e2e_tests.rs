//! End-to-end integration tests
//!
//! These tests drive the simulator exactly as the binary does: parse CLI
//! arguments, build the ledger, run the workload and write the CSV reports.
//!
//! Account fixtures are located in tests/fixtures/ and cover:
//! - A valid five-account setup
//! - Duplicate account ids
//! - A ledger too small to pick distinct pairs
//! - Malformed balances
//! - Balances whose sum does not fit in a Decimal
//!
//! Conserving runs are repeated with every scheduling strategy.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use concurrent_ledger::cli::{self, CliArgs, StrategyType};
    use concurrent_ledger::LedgerError;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::fs;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    /// Parse `id,balance` output rows into pairs
    fn parse_accounts_output(output: &[u8]) -> Vec<(u32, Decimal)> {
        let text = String::from_utf8(output.to_vec()).expect("output is not UTF-8");
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,balance"));

        lines
            .map(|line| {
                let (id, balance) = line.split_once(',').expect("malformed output row");
                (
                    id.parse().expect("invalid id"),
                    Decimal::from_str(balance).expect("invalid balance"),
                )
            })
            .collect()
    }

    fn strategy_name(strategy: &StrategyType) -> &'static str {
        match strategy {
            StrategyType::Sequential => "sequential",
            StrategyType::Threaded => "threaded",
            StrategyType::Async => "async",
        }
    }

    #[rstest]
    fn test_fixture_run_conserves_funds(
        #[values(StrategyType::Sequential, StrategyType::Threaded, StrategyType::Async)]
        strategy: StrategyType,
    ) {
        let args = CliArgs::try_parse_from([
            "ledger-sim",
            "--accounts",
            "tests/fixtures/five_accounts.csv",
            "--strategy",
            strategy_name(&strategy),
            "--workers",
            "10",
            "--transfers",
            "200",
            "--seed",
            "42",
        ])
        .unwrap();
        let mut output = Vec::new();

        let summary = cli::run(&args, &mut output)
            .unwrap_or_else(|e| panic!("simulation failed ({:?}): {}", strategy, e));

        let expected_total = Decimal::from_str("1920.5").unwrap();
        assert_eq!(summary.initial_total, expected_total);
        assert_eq!(summary.final_total, expected_total);
        assert_eq!(summary.report.attempted, 2_000);

        let accounts = parse_accounts_output(&output);
        let ids: Vec<u32> = accounts.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let total: Decimal = accounts.iter().map(|(_, balance)| *balance).sum();
        assert_eq!(total, expected_total);
        assert!(accounts.iter().all(|(_, balance)| *balance >= Decimal::ZERO));
    }

    #[test]
    fn test_random_ledger_run_with_defaults() {
        let args = CliArgs::try_parse_from(["ledger-sim", "--seed", "1"]).unwrap();
        let mut output = Vec::new();

        let summary = cli::run(&args, &mut output).unwrap();

        assert_eq!(summary.report.attempted, 100);
        let accounts = parse_accounts_output(&output);
        assert_eq!(accounts.len(), 5);
        for (_, balance) in &accounts {
            assert!(*balance >= Decimal::ZERO);
        }
        let total: Decimal = accounts.iter().map(|(_, balance)| *balance).sum();
        assert_eq!(total, summary.initial_total);
    }

    #[test]
    fn test_audit_log_is_written() {
        let audit_file = NamedTempFile::new().expect("Failed to create temp file");
        let audit_path = audit_file.path().to_str().unwrap().to_string();
        let args = CliArgs::try_parse_from([
            "ledger-sim",
            "--accounts",
            "tests/fixtures/five_accounts.csv",
            "--workers",
            "4",
            "--transfers",
            "25",
            "--audit-output",
            audit_path.as_str(),
        ])
        .unwrap();
        let mut output = Vec::new();

        cli::run(&args, &mut output).unwrap();

        let audit = fs::read_to_string(&audit_path).unwrap();
        let mut lines = audit.lines();
        assert_eq!(
            lines.next(),
            Some("sequence,source,destination,amount,status,source_balance,destination_balance")
        );
        let rows: Vec<&str> = lines.collect();
        assert_eq!(rows.len(), 100);
        for (position, row) in rows.iter().enumerate() {
            let fields: Vec<&str> = row.split(',').collect();
            assert_eq!(fields[0], position.to_string());
            assert!(fields[4] == "completed" || fields[4] == "insufficient-funds");
        }
    }

    #[rstest]
    #[case::missing_file("tests/fixtures/does_not_exist.csv", "Failed to open file")]
    #[case::duplicate_ids("tests/fixtures/duplicate_ids.csv", "Account 1 already exists")]
    #[case::malformed_balance("tests/fixtures/malformed_balance.csv", "at line 3")]
    #[case::single_account("tests/fixtures/single_account.csv", "at least 2 accounts")]
    #[case::overflowing_total(
        "tests/fixtures/overflowing_total.csv",
        "Total balance exceeds the representable range"
    )]
    fn test_setup_errors(#[case] accounts_file: &str, #[case] expected_error: &str) {
        let args =
            CliArgs::try_parse_from(["ledger-sim", "--accounts", accounts_file]).unwrap();
        let mut output = Vec::new();

        let error = cli::run(&args, &mut output).unwrap_err();

        assert!(
            error.to_string().contains(expected_error),
            "unexpected error: {}",
            error
        );
        assert!(output.is_empty());
    }

    #[test]
    fn test_log_audit_run_still_writes_accounts() {
        let args = CliArgs::try_parse_from([
            "ledger-sim",
            "--accounts",
            "tests/fixtures/five_accounts.csv",
            "--strategy",
            "sequential",
            "--log-audit",
            "--seed",
            "3",
        ])
        .unwrap();
        let mut output = Vec::new();

        let summary = cli::run(&args, &mut output).unwrap();

        assert_eq!(summary.final_total, summary.initial_total);
        assert_eq!(parse_accounts_output(&output).len(), 5);
    }

    #[test]
    fn test_single_account_error_kind() {
        let args = CliArgs::try_parse_from([
            "ledger-sim",
            "--accounts",
            "tests/fixtures/single_account.csv",
        ])
        .unwrap();
        let mut output = Vec::new();

        assert_eq!(
            cli::run(&args, &mut output).unwrap_err(),
            LedgerError::NotEnoughAccounts { count: 1 }
        );
    }
}
