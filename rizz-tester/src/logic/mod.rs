pub mod assets;
pub mod game_tester;
pub mod policy;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use assets::TesterAssets;
pub use game_tester::{
    GameTester, SimulationExpectation, SimulationPlan, SimulationSummary, StepRecord,
};
pub use policy::{PlayAction, PlayStrategy, PlayerPolicy};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use tester::*;
