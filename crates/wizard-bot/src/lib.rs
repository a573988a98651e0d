pub mod bot;
pub mod policy;
pub mod probability;
pub mod search;

pub use bot::{BidPlanner, BotContext, BotParams, PlayPlanner, TrumpPlanner};
pub use policy::{
    MonteCarloStrategy, ProbabilisticStrategy, RandomStrategy, Strategy, StrategyContext,
    StrategyKind,
};
pub use probability::{ProbabilityMode, Situation, TrickView, WinProbability};
pub use search::{BidEstimate, Position, SearchConfig, TreeSearch, WinHistogram};
