// Built-in Presets — the six historical cases of the course catalogue
// Protocol levels 1..3 map to I = level / 10; catalogue capabilities carry no
// level, so each is entered at CATALOGUE_CAPABILITY_LEVEL.

use coalition_engine::{Agent, Scenario};

pub const CATALOGUE_CAPABILITY_LEVEL: f64 = 0.7;

// ─── Preset Configuration ───────────────────────────────────────────────────

pub struct GroupSpec {
    pub name: &'static str,
    pub capabilities: &'static [&'static str],
    pub beliefs: &'static [(&'static str, f64)],
    pub initial_atcf: f64,
}

pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub period: &'static str,
    pub tradition: &'static str,
    pub task: &'static str,
    /// Catalogue protocol level, 1 (light) to 3 (heavy).
    pub protocol_level: u8,
    pub tolerance: f64,
    /// Catalogue horizon `T`.
    pub steps: usize,
    /// Catalogue ensemble size `N`.
    pub runs: usize,
    pub groups: &'static [GroupSpec],
}

impl Preset {
    pub fn protocol_complexity(&self) -> f64 {
        f64::from(self.protocol_level) / 10.0
    }

    pub fn scenario(&self) -> Scenario {
        let agents = self
            .groups
            .iter()
            .enumerate()
            .map(|(idx, group)| {
                let agent = Agent::new(idx as u32 + 1, group.name, group.initial_atcf);
                let agent = group.capabilities.iter().fold(agent, |a, cap| {
                    a.with_capability(*cap, CATALOGUE_CAPABILITY_LEVEL)
                });
                group
                    .beliefs
                    .iter()
                    .fold(agent, |a, (belief, strength)| a.with_belief(*belief, *strength))
            })
            .collect();
        Scenario::new(self.task, agents, self.protocol_complexity(), self.tolerance)
    }
}

pub fn find(query: &str) -> Option<&'static Preset> {
    let q = query.to_lowercase();
    PRESETS
        .iter()
        .find(|p| p.id == q)
        .or_else(|| PRESETS.iter().find(|p| p.name.to_lowercase().contains(&q)))
}

// ─── Catalogue ──────────────────────────────────────────────────────────────

pub static PRESETS: &[Preset] = &[
    Preset {
        id: "ancient-athens",
        name: "Ancient Athens: The Trial of Socrates",
        period: "430 BCE",
        tradition: "Virtue Ethics",
        task: "Decide whether to honor Socrates or execute him for corrupting youth",
        protocol_level: 3,
        tolerance: 0.12,
        steps: 24,
        runs: 100,
        groups: &[
            GroupSpec {
                name: "Traditional_Citizens",
                capabilities: &["warfare", "farming", "civic_participation"],
                beliefs: &[("honor_gods", 0.9), ("respect_tradition", 0.85), ("athenian_excellence", 0.8)],
                initial_atcf: 0.78,
            },
            GroupSpec {
                name: "Philosopher_Students",
                capabilities: &["dialectic", "teaching", "questioning"],
                beliefs: &[("examined_life", 0.95), ("knowledge_is_virtue", 0.9)],
                initial_atcf: 0.82,
            },
            GroupSpec {
                name: "Democratic_Leaders",
                capabilities: &["oratory", "political_organization"],
                beliefs: &[("democratic_governance", 0.88), ("athenian_greatness", 0.9)],
                initial_atcf: 0.75,
            },
        ],
    },
    Preset {
        id: "enlightenment-europe",
        name: "Enlightenment Europe: Peace Treaty",
        period: "1795",
        tradition: "Deontology",
        task: "Establish peace treaty principles after religious wars",
        protocol_level: 2,
        tolerance: 0.30,
        steps: 52,
        runs: 100,
        groups: &[
            GroupSpec {
                name: "Catholic_Diplomats",
                capabilities: &["diplomacy", "natural_law_reasoning"],
                beliefs: &[("catholic_truth", 0.9), ("natural_law", 0.85)],
                initial_atcf: 0.72,
            },
            GroupSpec {
                name: "Protestant_Diplomats",
                capabilities: &["scripture_interpretation", "individual_conscience"],
                beliefs: &[("scripture_alone", 0.92), ("protestant_truth", 0.85)],
                initial_atcf: 0.75,
            },
            GroupSpec {
                name: "Rationalist_Philosophers",
                capabilities: &["logical_reasoning", "secular_ethics"],
                beliefs: &[("reason_supreme", 0.95), ("universal_principles", 0.9)],
                initial_atcf: 0.8,
            },
        ],
    },
    Preset {
        id: "industrial-revolution",
        name: "Industrial Revolution: Factory Reform",
        period: "1833",
        tradition: "Consequentialism",
        task: "Pass Factory Act limiting child labor",
        protocol_level: 1,
        tolerance: 0.35,
        steps: 26,
        runs: 100,
        groups: &[
            GroupSpec {
                name: "Factory_Owners",
                capabilities: &["capital", "production"],
                beliefs: &[("free_market", 0.9), ("competition_necessary", 0.85)],
                initial_atcf: 0.7,
            },
            GroupSpec {
                name: "Factory_Workers",
                capabilities: &["labor", "organizing"],
                beliefs: &[("fair_treatment", 0.95), ("child_protection", 0.92)],
                initial_atcf: 0.65,
            },
            GroupSpec {
                name: "Utilitarian_Reformers",
                capabilities: &["data_collection", "legislative_drafting"],
                beliefs: &[("maximize_welfare", 0.95), ("evidence_based", 0.88)],
                initial_atcf: 0.78,
            },
        ],
    },
    Preset {
        id: "green-belt-movement",
        name: "Green Belt Movement: Coordination Across Difference",
        period: "1977-2006",
        tradition: "Complexity Ethics",
        task: "Plant 50 million trees with women controlling nurseries",
        protocol_level: 1,
        tolerance: 0.40,
        steps: 156,
        runs: 200,
        groups: &[
            GroupSpec {
                name: "Rural_Women",
                capabilities: &["local_knowledge", "organizing"],
                beliefs: &[("family_survival", 0.95), ("community_care", 0.9)],
                initial_atcf: 0.68,
            },
            GroupSpec {
                name: "Scientists",
                capabilities: &["ecological_knowledge", "research"],
                beliefs: &[("ecosystem_restoration", 0.92), ("indigenous_species", 0.88)],
                initial_atcf: 0.75,
            },
            GroupSpec {
                name: "Feminist_Activists",
                capabilities: &["political_organizing", "advocacy"],
                beliefs: &[("women_empowerment", 0.95), ("gender_justice", 0.92)],
                initial_atcf: 0.73,
            },
            GroupSpec {
                name: "Christian_Stewards",
                capabilities: &["moral_authority", "community_organizing"],
                beliefs: &[("creation_care", 0.9), ("service_to_poor", 0.92)],
                initial_atcf: 0.77,
            },
        ],
    },
    Preset {
        id: "climate-change",
        name: "Climate Change: Planetary Crisis",
        period: "2015-Present",
        tradition: "Applied Complexity Ethics",
        task: "Limit global warming to 1.5°C",
        protocol_level: 1,
        tolerance: 0.45,
        steps: 78,
        runs: 200,
        groups: &[
            GroupSpec {
                name: "US_Conservatives",
                capabilities: &["economic_power", "technology"],
                beliefs: &[("market_solutions", 0.88), ("innovation", 0.85)],
                initial_atcf: 0.72,
            },
            GroupSpec {
                name: "EU_Progressives",
                capabilities: &["policy_expertise", "regulation"],
                beliefs: &[("precautionary_principle", 0.9), ("global_cooperation", 0.92)],
                initial_atcf: 0.75,
            },
            GroupSpec {
                name: "Indigenous_Peoples",
                capabilities: &["traditional_knowledge", "land_stewardship"],
                beliefs: &[("land_relationship", 0.95), ("seven_generations", 0.93)],
                initial_atcf: 0.7,
            },
            GroupSpec {
                name: "Global_South",
                capabilities: &["demographic_power", "moral_claims"],
                beliefs: &[("development_right", 0.95), ("climate_justice", 0.92)],
                initial_atcf: 0.68,
            },
        ],
    },
    Preset {
        id: "ai-safety",
        name: "AI Safety: Future Coordination",
        period: "2025-2035",
        tradition: "Applied Complexity Ethics",
        task: "Develop transformative AI safely with equitable benefits",
        protocol_level: 2,
        tolerance: 0.35,
        steps: 52,
        runs: 200,
        groups: &[
            GroupSpec {
                name: "Tech_Companies",
                capabilities: &["AI_development", "capital"],
                beliefs: &[("innovation_primary", 0.92), ("market_competition", 0.88)],
                initial_atcf: 0.75,
            },
            GroupSpec {
                name: "Safety_Researchers",
                capabilities: &["technical_expertise", "risk_modeling"],
                beliefs: &[("existential_risk", 0.95), ("precautionary_principle", 0.9)],
                initial_atcf: 0.77,
            },
            GroupSpec {
                name: "Ethics_Scholars",
                capabilities: &["moral_reasoning", "deliberation"],
                beliefs: &[("human_dignity", 0.93), ("democratic_control", 0.88)],
                initial_atcf: 0.72,
            },
            GroupSpec {
                name: "Global_South_Representatives",
                capabilities: &["political_representation", "advocacy"],
                beliefs: &[("tech_colonialism_concern", 0.9), ("benefit_sharing", 0.88)],
                initial_atcf: 0.68,
            },
        ],
    },
];
