pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::catalog_scenarios;

/// A named logic scenario: one plan plus the checks run on each iteration.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, description: &'static str, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            description,
            plan,
        }
    }
}

/// Scenario keys in the order `all` expands to.
#[must_use]
pub fn scenario_names() -> Vec<String> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| scenario.name)
        .collect()
}

#[must_use]
pub fn list_scenarios() -> Vec<(String, &'static str)> {
    catalog_scenarios()
        .into_iter()
        .map(|scenario| (scenario.name, scenario.description))
        .collect()
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let key = name.trim().to_ascii_lowercase();
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == key)
}
