use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};
use tempfile::tempdir;
use wizard_bench::config::BenchmarkConfig;
use wizard_bench::tournament::{RunSummary, TournamentRunner};

fn load_config(output_dir: &Path) -> BenchmarkConfig {
    let yaml = format!(
        r#"
run_id: "test_smoke"
games:
  seed: 4242
  count: 1
  rotations: 2
agents:
  - name: "baseline"
    kind: "random"
  - name: "tree"
    kind: "search"
    params:
      search_iterations: 2
      branch_factor: 1
  - name: "odds"
    kind: "probabilistic"
    params:
      probability_mode: "suit_aware"
outputs:
  jsonl: "{jsonl}"
  summary_md: "{summary}"
  plots_dir: "{plots}"
metrics:
  baseline: "baseline"
logging:
  enable_structured: false
"#,
        jsonl = output_dir.join("rounds.jsonl").display(),
        summary = output_dir.join("summary.md").display(),
        plots = output_dir.join("plots").display()
    );

    let mut cfg: BenchmarkConfig = serde_yaml::from_str(&yaml).expect("valid yaml");
    cfg.validate().expect("config validates");
    cfg
}

fn run_once() -> (RunSummary, Vec<serde_json::Value>, String) {
    let dir = tempdir().expect("temp dir");
    let config = load_config(dir.path());
    let outputs = config.resolved_outputs();

    let runner = TournamentRunner::new(config, outputs).expect("runner created");
    let summary = runner.run().expect("tournament completes");
    assert!(summary.summary_path.exists(), "summary markdown missing");
    if let Some(plot_path) = summary.plot_path.as_ref() {
        assert!(plot_path.exists(), "plot path reported but missing on disk");
    }

    let jsonl = fs::read_to_string(&summary.jsonl_path).expect("jsonl readable");
    let mut rows = Vec::new();
    let mut normalized = String::new();
    for line in jsonl.lines() {
        let mut value: serde_json::Value = serde_json::from_str(line).expect("row decodes to JSON");
        if let Some(speed) = value.get_mut("ms_per_decision") {
            *speed = serde_json::Value::from(0.0);
        }
        normalized.push_str(&serde_json::to_string(&value).expect("re-serialize normalized row"));
        normalized.push('\n');
        rows.push(value);
    }

    let digest = hex::encode(Sha256::digest(normalized.as_bytes()));
    (summary, rows, digest)
}

#[test]
fn tournament_smoke_test_is_reproducible() {
    let (summary, rows, first_digest) = run_once();
    let (_, _, second_digest) = run_once();
    assert_eq!(first_digest, second_digest, "same seed produced different JSONL");

    assert_eq!(summary.games_played, 1);
    assert_eq!(summary.rotations, 2);
    // 3 players play 20 rounds; one row per seat per round.
    assert_eq!(summary.rows_written, 2 * 20 * 3);
    assert_eq!(rows.len(), summary.rows_written);
}

#[test]
fn rows_add_up_to_the_running_totals() {
    let (_, rows, _) = run_once();

    for game in ["G00000_R00", "G00000_R01"] {
        for seat in ["seat0", "seat1", "seat2"] {
            let seat_rows: Vec<&serde_json::Value> = rows
                .iter()
                .filter(|row| row["game_id"] == game && row["seat"] == seat)
                .collect();
            assert_eq!(seat_rows.len(), 20);

            let mut total = 0;
            for (index, row) in seat_rows.iter().enumerate() {
                let round = row["round"].as_u64().unwrap();
                assert_eq!(round, index as u64 + 1);
                let bid = row["bid"].as_u64().unwrap();
                let won = row["won"].as_u64().unwrap();
                assert!(bid <= round && won <= round);
                let score = row["round_score"].as_i64().unwrap();
                if bid == won {
                    assert_eq!(score, 20 + 10 * won as i64);
                } else {
                    assert_eq!(score, -10 * (bid as i64 - won as i64).abs());
                }
                total += score;
                assert_eq!(row["total_score"].as_i64().unwrap(), total);
            }
        }
    }

    for round in 1..=20u64 {
        let won: u64 = rows
            .iter()
            .filter(|row| row["game_id"] == "G00000_R00" && row["round"] == round)
            .map(|row| row["won"].as_u64().unwrap())
            .sum();
        assert_eq!(won, round, "every trick of round {round} has one winner");
    }
}
