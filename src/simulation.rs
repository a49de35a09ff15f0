use crate::placement::place_initial_tokens;
use crate::token::Token;
use anyhow::Result;
use log::{debug, info};
use rand::prelude::*;
use simulation_common::{Kind, KindCounts, SimParams, SimulationConfig, Snapshot, TokenRecord, TokenRenderer, TokenView};

/// What happened during one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub wall_bounces: usize,
    pub collisions: usize,
    pub conversions: usize,
}

impl StepReport {
    pub fn any_conversions(&self) -> bool {
        self.conversions > 0
    }
}

/// Owns the token population and advances it one step per tick.
pub struct Simulation {
    params: SimParams,
    /// Tokens in creation order. Pairwise checks follow this order.
    tokens: Vec<Token>,
    /// Seed used for the initial layout.
    seed: u64,
    /// Number of steps taken so far.
    current_step: u64,
    /// Whether snapshots carry every token's position.
    save_tokens_in_snapshot: bool,
    recorded_snapshots: Vec<Snapshot>,
}

impl Simulation {
    /// Creates a simulation with default speeds and seed 0.
    pub fn create(amount_each: u32, surface_size: f32, radius: f32) -> Result<Self> {
        Self::with_seed(amount_each, surface_size, radius, 0)
    }

    pub fn with_seed(amount_each: u32, surface_size: f32, radius: f32, seed: u64) -> Result<Self> {
        Self::from_params(SimParams::new(amount_each, surface_size, radius), seed)
    }

    /// Creates a simulation from a loaded configuration.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut sim = Self::from_params(config.get_sim_params(), config.initial_conditions.seed)?;
        sim.save_tokens_in_snapshot = config.output.save_tokens_in_snapshot;
        Ok(sim)
    }

    /// Places the initial population with an RNG seeded from `seed`.
    pub fn from_params(params: SimParams, seed: u64) -> Result<Self> {
        params.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let tokens = place_initial_tokens(&params, &mut rng)?;
        info!(
            "Placed {} tokens ({} per kind) on a {}x{} surface, seed {}.",
            tokens.len(),
            params.amount_each,
            params.surface_size,
            params.surface_size,
            seed
        );
        Ok(Self::assemble(params, tokens, seed))
    }

    /// Builds a simulation from an explicit layout instead of random placement.
    /// The population need not match `amount_each`.
    pub fn from_tokens(params: SimParams, tokens: Vec<Token>) -> Result<Self> {
        params.validate()?;
        Ok(Self::assemble(params, tokens, 0))
    }

    fn assemble(params: SimParams, tokens: Vec<Token>, seed: u64) -> Self {
        Self {
            params,
            tokens,
            seed,
            current_step: 0,
            save_tokens_in_snapshot: true,
            recorded_snapshots: Vec::new(),
        }
    }

    /// Advances the simulation by one tick: move every token, then resolve
    /// every colliding pair.
    pub fn step(&mut self) -> StepReport {
        let mut report = StepReport::default();

        // --- 1. Motion and wall bounce ---
        let surface_size = self.params.surface_size;
        let radius = self.params.radius;
        for token in &mut self.tokens {
            if token.advance(surface_size, radius) {
                report.wall_bounces += 1;
            }
        }

        // --- 2. Pairwise collisions ---
        self.resolve_collisions(&mut report);

        self.current_step += 1;
        report
    }

    /// Exhaustive pairwise check in creation order. Each colliding pair has both
    /// velocities reversed and the loser converted to the winner's kind. Kinds
    /// are read as each pair is visited, so earlier conversions in the same step
    /// are seen by later pairs.
    fn resolve_collisions(&mut self, report: &mut StepReport) {
        let radius = self.params.radius;
        let count = self.tokens.len();

        for i in 0..count {
            for j in (i + 1)..count {
                let (head, tail) = self.tokens.split_at_mut(j);
                let first = &mut head[i];
                let second = &mut tail[0];

                if !first.collides_with(second, radius) {
                    continue;
                }
                report.collisions += 1;
                first.reverse();
                second.reverse();

                if let Some((loser, winner_kind)) = convert_loser(first, second) {
                    let index = if loser == Side::First { i } else { j };
                    debug!("Step {}: token {} converted to {}.", self.current_step + 1, index, winner_kind);
                    report.conversions += 1;
                }
            }
        }
    }

    /// Read-only views of every token, in simulation order.
    pub fn tokens(&self) -> impl Iterator<Item = TokenView> + '_ {
        let radius = self.params.radius;
        self.tokens.iter().map(move |token| token.view(radius))
    }

    /// Full token state, including velocities.
    pub fn token_states(&self) -> &[Token] {
        &self.tokens
    }

    /// Hands every token to `renderer`, in simulation order.
    pub fn render<R: TokenRenderer + ?Sized>(&self, renderer: &mut R) {
        for view in self.tokens() {
            renderer.render_token(&view);
        }
    }

    pub fn kind_counts(&self) -> KindCounts {
        self.tokens.iter().map(|token| token.kind).collect()
    }

    /// The kind every token has converted to, once the game is decided.
    pub fn dominant_kind(&self) -> Option<Kind> {
        self.kind_counts().sole_survivor()
    }

    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn current_token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Records the current state, with token positions when configured.
    pub fn record_snapshot(&mut self) {
        let tokens = if self.save_tokens_in_snapshot {
            let mut records = Vec::with_capacity(self.tokens.len());
            self.render(&mut |view: &TokenView| records.push(TokenRecord::from(view)));
            Some(records)
        } else {
            None
        };

        let snapshot = Snapshot {
            step: self.current_step,
            kind_counts: self.kind_counts(),
            tokens,
        };
        debug!("Recorded snapshot at step {}: {}.", snapshot.step, snapshot.kind_counts);
        self.recorded_snapshots.push(snapshot);
    }

    /// Provides access to the recorded snapshots.
    pub fn recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    First,
    Second,
}

/// Applies the dominance rule to a colliding pair. Returns which token lost and
/// the kind it took, or None for same-kind pairs.
fn convert_loser(first: &mut Token, second: &mut Token) -> Option<(Side, Kind)> {
    if first.kind == second.kind {
        None
    } else if first.kind.weakness() == second.kind {
        first.convert(second.kind);
        Some((Side::First, second.kind))
    } else {
        second.convert(first.kind);
        Some((Side::Second, first.kind))
    }
}
