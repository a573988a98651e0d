mod rotations;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::analytics::{AnalyticsCollector, AnalyticsError};
use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs};
use crate::logging::telemetry_path;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};
use wizard_bot::bot::BotParams;
use wizard_bot::policy::{Strategy, StrategyContext};
use wizard_bot::probability::ProbabilityMode;
use wizard_core::game::match_state::{MatchState, TrumpIndicator};
use wizard_core::model::board::Board;
use wizard_core::model::card::Card;
use wizard_core::model::hand::Hand;
use wizard_core::model::player::Seat;
use wizard_core::model::suit::Suit;
use wizard_core::model::trick::Trick;

pub use rotations::SeatRotations;

/// Plays seeded full games between the configured agents.
pub struct TournamentRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    rotations: SeatRotations,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub rotations: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub telemetry_path: Option<PathBuf>,
}

impl TournamentRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let base = BotParams::from_env();
        let agents = AgentBlueprint::from_configs(&config.agents, base)?;

        if config.games.rotations > agents.len() {
            return Err(RunnerError::RotationLimit {
                requested: config.games.rotations,
                max: agents.len(),
            });
        }

        let rotations = SeatRotations::new(agents.len(), config.games.rotations);

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
            rotations,
        })
    }

    /// Execute the tournament, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let seatings = self.rotations.as_slice();
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut rows_written = 0usize;
        let mut analytics = AnalyticsCollector::new(&self.config)?;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();

            for (rotation_index, seating) in seatings.iter().enumerate() {
                let outcome = self.play_game(game_index, rotation_index, game_seed, seating)?;
                analytics.record_game(game_index, rotation_index, &outcome)?;
                rows_written += write_game_rows(
                    &mut writer,
                    &self.config.run_id,
                    game_index,
                    rotation_index,
                    game_seed,
                    &outcome,
                )?;
            }
        }

        writer.flush()?;

        let summary = analytics.finalize()?;
        summary.write_markdown(&self.outputs.summary_md)?;
        let plot_path = match summary.render_plot(&self.outputs.plots_dir) {
            Ok(path) => Some(path),
            Err(err) => {
                eprintln!("WARN: {}", err);
                None
            }
        };

        Ok(RunSummary {
            games_played: self.config.games.count,
            rotations: seatings.len(),
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            plot_path,
            telemetry_path: self
                .logging_enabled
                .then(|| telemetry_path(&self.outputs)),
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn write_game_rows(
    writer: &mut BufWriter<File>,
    run_id: &str,
    game_index: usize,
    rotation_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<usize, RunnerError> {
    let game_id = format!("G{game_index:05}_R{rotation_index:02}");

    let mut rows_written = 0usize;
    for round in &outcome.rounds {
        for (index, seat) in outcome.seat_results.iter().enumerate() {
            let metrics = &round.metrics[index];
            let row = RoundLogRow {
                run_id,
                game_id: &game_id,
                game_index,
                rotation_index,
                game_seed,
                round: round.round,
                trump: round.trump.map(|suit| suit.to_string()),
                seat: seat.seat.to_string(),
                agent: &seat.agent_name,
                bid: round.bids[index],
                won: round.won[index],
                round_score: round.scores[index],
                total_score: round.totals[index],
                decisions: metrics.decisions,
                ms_per_decision: metrics.avg_ms_per_decision,
            };

            serde_json::to_writer(&mut *writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }
    }

    Ok(rows_written)
}

impl TournamentRunner {
    fn play_game(
        &self,
        game_index: usize,
        rotation_index: usize,
        game_seed: u64,
        seating: &[usize],
    ) -> Result<GameOutcome, RunnerError> {
        let mut state = MatchState::with_seed(seating.len(), game_seed)
            .map_err(|err| RunnerError::game(err.to_string()))?;
        let mut seats = build_seat_states(seating, &self.agents, game_seed)?;

        let mut rounds = Vec::with_capacity(state.total_rounds());
        while !state.is_complete() {
            let mut record = self.play_round(game_index, rotation_index, &mut state, &mut seats)?;
            state.finish_round(&record.scores);
            record.totals = state.scores().standings().to_vec();
            rounds.push(record);
        }

        let standings = state.scores().standings();
        let seat_results = seats
            .into_iter()
            .map(|seat| {
                let index = seat.seat.index();
                SeatResult {
                    exact_bids: rounds
                        .iter()
                        .filter(|round| round.bids[index] == round.won[index])
                        .count(),
                    rounds: rounds.len(),
                    final_score: standings[index],
                    agent_name: seat.agent_name,
                    seat: seat.seat,
                    metrics: seat.game_metrics.finalize(),
                }
            })
            .collect();

        Ok(GameOutcome {
            seat_results,
            rounds,
        })
    }

    fn play_round(
        &self,
        game_index: usize,
        rotation_index: usize,
        state: &mut MatchState,
        seats: &mut [SeatState],
    ) -> Result<RoundRecord, RunnerError> {
        let players = state.player_count();
        let round_number = state.round_number();
        let tag = RoundTag {
            game_index,
            rotation_index,
            round: round_number,
        };
        let deal = state.deal();
        let mut hands: Vec<Hand> = deal.hands;
        let mut board = Board::new(
            players,
            round_number,
            deal.trump_card,
            None,
            state.first_player(),
        );
        for seat in seats.iter_mut() {
            seat.strategy.begin_round(&board);
            seat.round_metrics = DecisionMetrics::default();
        }

        let trump = match TrumpIndicator::from_card(deal.trump_card) {
            TrumpIndicator::NoTrump => None,
            TrumpIndicator::Suit(suit) => Some(suit),
            TrumpIndicator::DealerChooses => {
                let dealer = state.dealer();
                let seat_state = &mut seats[dealer.index()];
                let ctx = StrategyContext {
                    seat: dealer,
                    hand: &hands[dealer.index()],
                    board: &board,
                };
                let start = Instant::now();
                let suit = seat_state.strategy.choose_trump(&ctx);
                let elapsed_ms = seat_state.record(start.elapsed());
                self.log_decision(tag, "trump", dealer, &suit, elapsed_ms);
                Some(suit)
            }
        };
        board.set_trump(trump);

        for seat in state.first_player().cycle_from(players) {
            let seat_state = &mut seats[seat.index()];
            let ctx = StrategyContext {
                seat,
                hand: &hands[seat.index()],
                board: &board,
            };
            let start = Instant::now();
            let bid = seat_state.strategy.select_bid(&ctx);
            let elapsed_ms = seat_state.record(start.elapsed());
            if usize::from(bid) > round_number {
                return Err(RunnerError::InvalidBid {
                    agent: seat_state.agent_name.clone(),
                    bid,
                    round: round_number,
                });
            }
            self.log_decision(tag, "bid", seat, &bid, elapsed_ms);
            board.set_bid(seat, bid);
        }

        let mut leader = state.first_player();
        for _ in 0..round_number {
            let mut trick = Trick::new(leader, trump, players);
            for seat in leader.cycle_from(players) {
                let legal = trick.legal_cards(hands[seat.index()].cards());
                let seat_state = &mut seats[seat.index()];
                let ctx = StrategyContext {
                    seat,
                    hand: &hands[seat.index()],
                    board: &board,
                };
                let start = Instant::now();
                let card = seat_state.strategy.select_card(&ctx, &trick, &legal);
                let elapsed_ms = seat_state.record(start.elapsed());

                if !legal.contains(&card) || !hands[seat.index()].remove(card) {
                    return Err(RunnerError::IllegalCard {
                        agent: seat_state.agent_name.clone(),
                        seat,
                        card,
                    });
                }
                self.log_decision(tag, "play", seat, &card, elapsed_ms);
                trick.play(seat, card).map_err(|err| {
                    RunnerError::game(format!("{seat} could not play {card}: {err}"))
                })?;
                board.card_played(seat, card);
            }

            let winner = trick
                .winner()
                .ok_or_else(|| RunnerError::game("completed trick has no winner".to_string()))?;
            board.trick_won(winner);
            for seat_state in seats.iter_mut() {
                seat_state.strategy.observe_trick_result(&trick);
            }
            leader = winner;
        }

        Ok(RoundRecord {
            round: round_number,
            trump,
            bids: board.bids().iter().map(|bid| bid.unwrap_or(0)).collect(),
            won: board.tricks_won_all().to_vec(),
            scores: board.round_scores(),
            totals: Vec::new(),
            metrics: seats
                .iter_mut()
                .map(|seat| std::mem::take(&mut seat.round_metrics).finalize())
                .collect(),
        })
    }

    fn log_decision(
        &self,
        tag: RoundTag,
        kind: &'static str,
        seat: Seat,
        choice: &dyn std::fmt::Display,
        elapsed_ms: f64,
    ) {
        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "wizard_bench::decision",
                Level::INFO,
                run_id = %self.config.run_id,
                kind,
                game_index = tag.game_index as u32,
                rotation_index = tag.rotation_index as u32,
                round = tag.round as u32,
                seat = %seat,
                choice = %choice,
                elapsed_ms
            );
        }
    }
}

fn build_seat_states(
    seating: &[usize],
    agents: &[AgentBlueprint],
    game_seed: u64,
) -> Result<Vec<SeatState>, RunnerError> {
    let mut seeds = StdRng::seed_from_u64(game_seed);
    let mut seats = Vec::with_capacity(seating.len());
    for (seat_idx, agent_idx) in seating.iter().enumerate() {
        let agent = agents.get(*agent_idx).ok_or(RunnerError::InvalidRotation {
            index: seat_idx,
            agent_index: *agent_idx,
        })?;
        seats.push(SeatState::new(
            Seat::new(seat_idx as u8),
            agent,
            seeds.next_u64(),
        ));
    }
    Ok(seats)
}

/// Where a decision happened, for telemetry.
#[derive(Clone, Copy)]
struct RoundTag {
    game_index: usize,
    rotation_index: usize,
    round: usize,
}

struct SeatState {
    seat: Seat,
    agent_name: String,
    strategy: Box<dyn Strategy>,
    round_metrics: DecisionMetrics,
    game_metrics: DecisionMetrics,
}

impl SeatState {
    fn new(seat: Seat, agent: &AgentBlueprint, seed: u64) -> Self {
        Self {
            seat,
            agent_name: agent.name.clone(),
            strategy: agent.kind.strategy().build(agent.params, seed),
            round_metrics: DecisionMetrics::default(),
            game_metrics: DecisionMetrics::default(),
        }
    }

    fn record(&mut self, duration: Duration) -> f64 {
        self.game_metrics.record(duration);
        self.round_metrics.record(duration)
    }
}

pub struct GameOutcome {
    pub seat_results: Vec<SeatResult>,
    pub rounds: Vec<RoundRecord>,
}

pub struct SeatResult {
    pub agent_name: String,
    pub seat: Seat,
    pub final_score: i32,
    pub rounds: usize,
    pub exact_bids: usize,
    pub metrics: DecisionSummary,
}

/// Per-round bids, tricks and scores indexed by seat.
pub struct RoundRecord {
    pub round: usize,
    pub trump: Option<Suit>,
    pub bids: Vec<u8>,
    pub won: Vec<u8>,
    pub scores: Vec<i32>,
    pub totals: Vec<i32>,
    pub metrics: Vec<DecisionSummary>,
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) -> f64 {
        self.total += duration;
        self.decisions += 1;
        duration.as_secs_f64() * 1000.0
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Clone)]
pub struct DecisionSummary {
    pub decisions: u32,
    pub avg_ms_per_decision: f64,
    pub total_ms: f64,
}

#[derive(Serialize)]
struct RoundLogRow<'a> {
    run_id: &'a str,
    game_id: &'a str,
    game_index: usize,
    rotation_index: usize,
    game_seed: u64,
    round: usize,
    trump: Option<String>,
    seat: String,
    agent: &'a str,
    bid: u8,
    won: u8,
    round_score: i32,
    total_score: i32,
    decisions: u32,
    ms_per_decision: f64,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {message}")]
    Game { message: String },
    #[error("agent '{agent}' bid {bid} in a round of {round} cards")]
    InvalidBid { agent: String, bid: u8, round: usize },
    #[error("agent '{agent}' at {seat} played illegal card {card}")]
    IllegalCard { agent: String, seat: Seat, card: Card },
    #[error("requested {requested} seat rotations exceeds maximum of {max}")]
    RotationLimit { requested: usize, max: usize },
    #[error("rotation seat {index} references invalid agent index {agent_index}")]
    InvalidRotation { index: usize, agent_index: usize },
    #[error("analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl RunnerError {
    fn game(message: String) -> Self {
        RunnerError::Game { message }
    }
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("invalid parameter '{key}' for agent '{name}': {message}")]
    InvalidParam {
        name: String,
        key: String,
        message: String,
    },
    #[error("params for agent '{name}' must be a mapping")]
    NotAMapping { name: String },
}

struct AgentBlueprint {
    name: String,
    kind: AgentKind,
    params: BotParams,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig], base: BotParams) -> Result<Vec<Self>, AgentError> {
        configs
            .iter()
            .map(|config| Self::from_config(config, base))
            .collect()
    }

    fn from_config(config: &AgentConfig, base: BotParams) -> Result<Self, AgentError> {
        Ok(Self {
            name: config.name.clone(),
            kind: config.kind,
            params: apply_params(&config.name, base, &config.params)?,
        })
    }
}

/// Layers per-agent YAML overrides on top of the environment defaults.
fn apply_params(
    name: &str,
    base: BotParams,
    params: &serde_yaml::Value,
) -> Result<BotParams, AgentError> {
    if params.is_null() {
        return Ok(base);
    }

    let mapping = params.as_mapping().ok_or_else(|| AgentError::NotAMapping {
        name: name.to_string(),
    })?;

    let mut result = base;
    for (key, value) in mapping {
        let key = key.as_str().unwrap_or_default();
        let invalid = |message: &str| AgentError::InvalidParam {
            name: name.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        };
        let positive = || {
            value
                .as_u64()
                .filter(|count| *count > 0)
                .map(|count| count as usize)
                .ok_or_else(|| invalid("expected a positive integer"))
        };

        match key {
            "search_iterations" => result.search_iterations = positive()?,
            "branch_factor" => result.branch_factor = positive()?,
            "sampler_attempts" => result.sampler_attempts = positive()?,
            "simulation_iterations" => result.simulation_iterations = positive()?,
            "win_threshold" => {
                result.win_threshold = value
                    .as_f64()
                    .filter(|threshold| (0.0..=1.0).contains(threshold))
                    .ok_or_else(|| invalid("expected a number between 0 and 1"))?;
            }
            "probability_mode" => {
                result.probability_mode = value
                    .as_str()
                    .and_then(ProbabilityMode::parse)
                    .ok_or_else(|| invalid("expected uniform, suit_aware or simulated"))?;
            }
            _ => return Err(invalid("unknown parameter")),
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(pairs: &[(&str, serde_yaml::Value)]) -> serde_yaml::Value {
        serde_yaml::Value::Mapping(
            pairs
                .iter()
                .map(|(key, value)| (serde_yaml::Value::String(key.to_string()), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn empty_params_keep_the_base() {
        let base = BotParams::default();
        let params = serde_yaml::Value::Mapping(Default::default());
        assert_eq!(apply_params("bot", base, &params).unwrap(), base);
        assert_eq!(
            apply_params("bot", base, &serde_yaml::Value::Null).unwrap(),
            base
        );
    }

    #[test]
    fn overrides_are_applied() {
        let params = mapping(&[
            ("search_iterations", 12.into()),
            ("branch_factor", 2.into()),
            ("win_threshold", 0.6.into()),
            ("probability_mode", "uniform".into()),
        ]);
        let result = apply_params("bot", BotParams::default(), &params).unwrap();
        assert_eq!(result.search_iterations, 12);
        assert_eq!(result.branch_factor, 2);
        assert_eq!(result.win_threshold, 0.6);
        assert_eq!(result.probability_mode, ProbabilityMode::Uniform);
        assert_eq!(result.simulation_iterations, 1000);
    }

    #[test]
    fn rejects_bad_values_and_unknown_keys() {
        for params in [
            mapping(&[("search_iterations", 0.into())]),
            mapping(&[("win_threshold", 2.0.into())]),
            mapping(&[("probability_mode", "oracle".into())]),
            mapping(&[("difficulty", "hard".into())]),
        ] {
            let err = apply_params("bot", BotParams::default(), &params).unwrap_err();
            assert!(matches!(err, AgentError::InvalidParam { .. }), "{err}");
        }
        let err = apply_params("bot", BotParams::default(), &"fast".into()).unwrap_err();
        assert!(matches!(err, AgentError::NotAMapping { .. }));
    }

    #[test]
    fn seat_states_follow_the_seating() {
        let agents: Vec<AgentBlueprint> = ["a", "b", "c"]
            .iter()
            .map(|name| AgentBlueprint {
                name: name.to_string(),
                kind: AgentKind::Random,
                params: BotParams::default(),
            })
            .collect();
        let seats = build_seat_states(&[2, 0, 1], &agents, 9).unwrap();
        let names: Vec<&str> = seats.iter().map(|s| s.agent_name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);

        assert!(matches!(
            build_seat_states(&[0, 5, 1], &agents, 9),
            Err(RunnerError::InvalidRotation { index: 1, agent_index: 5 })
        ));
    }
}
