// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Insight Rules
//
// Findings are read off a fixed rule table. Each metric rule picks the first
// band whose floor the value reaches; a metric with no matching band stays
// silent (robustness below 50 emits nothing). Parameter notes fire on their
// own, independent of the statistics.

use serde::{Deserialize, Serialize};

use crate::types::{EnsembleResult, EnsembleSummary, Scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Success,
    Warning,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub message: String,
}

// ─── Rule Table ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    SuccessRate,
    FinalAtcf,
    Robustness,
}

impl Metric {
    /// Value compared against band floors.
    fn value(self, summary: &EnsembleSummary) -> f64 {
        match self {
            Metric::SuccessRate => summary.avg_success_rate_pct,
            Metric::FinalAtcf => summary.avg_final_atcf,
            Metric::Robustness => summary.robustness_pct,
        }
    }

    /// Value as shown in a message: a whole percentage.
    fn display(self, summary: &EnsembleSummary) -> String {
        let pct = match self {
            Metric::FinalAtcf => summary.avg_final_atcf * 100.0,
            other => other.value(summary),
        };
        format!("{:.0}", pct.round())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub min: f64,
    pub category: InsightCategory,
    /// `{value}` is replaced by the displayed metric.
    pub template: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct MetricRule {
    pub metric: Metric,
    /// Highest floor first.
    pub bands: &'static [Band],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    ProtocolComplexity,
    Tolerance,
}

#[derive(Debug, Clone, Copy)]
pub struct ParameterRule {
    pub parameter: Parameter,
    /// Fires when the parameter is strictly above this.
    pub above: f64,
    pub template: &'static str,
}

pub const METRIC_RULES: &[MetricRule] = &[
    MetricRule {
        metric: Metric::SuccessRate,
        bands: &[
            Band {
                min: 70.0,
                category: InsightCategory::Success,
                template: "Strong coordination! {value}% success rate indicates this coalition design works well.",
            },
            Band {
                min: 40.0,
                category: InsightCategory::Warning,
                template: "Moderate success ({value}%). Consider adjusting I or ε to improve coordination.",
            },
            Band {
                min: f64::NEG_INFINITY,
                category: InsightCategory::Error,
                template: "Low success rate ({value}%). This coalition configuration needs significant redesign.",
            },
        ],
    },
    MetricRule {
        metric: Metric::FinalAtcf,
        bands: &[
            Band {
                min: 0.7,
                category: InsightCategory::Success,
                template: "Excellent authenticity maintenance! Groups preserved their identity (ATCF: {value}%).",
            },
            Band {
                min: 0.5,
                category: InsightCategory::Warning,
                template: "Moderate identity preservation (ATCF: {value}%). Some groups may feel compromised.",
            },
            Band {
                min: f64::NEG_INFINITY,
                category: InsightCategory::Error,
                template: "Low authenticity (ATCF: {value}%). Groups are losing their identity - increase ε or reduce I.",
            },
        ],
    },
    MetricRule {
        metric: Metric::Robustness,
        bands: &[
            Band {
                min: 80.0,
                category: InsightCategory::Success,
                template: "Highly robust design! Results are consistent across different runs ({value}% robustness).",
            },
            Band {
                min: 50.0,
                category: InsightCategory::Warning,
                template: "Moderate robustness ({value}%). Results vary somewhat between runs.",
            },
        ],
    },
];

pub const PARAMETER_RULES: &[ParameterRule] = &[
    ParameterRule {
        parameter: Parameter::ProtocolComplexity,
        above: 0.3,
        template: "High protocol complexity (I={value}). This creates friction but may ensure quality.",
    },
    ParameterRule {
        parameter: Parameter::Tolerance,
        above: 0.35,
        template: "High tolerance for difference (ε={value}). This enables diverse coordination.",
    },
];

// ─── Generation ──────────────────────────────────────────────────────────────

/// Findings for a summary and the I / epsilon it was produced under.
pub fn insights_for(summary: &EnsembleSummary, i: f64, epsilon: f64) -> Vec<Insight> {
    let mut insights: Vec<Insight> = METRIC_RULES
        .iter()
        .filter_map(|rule| {
            let value = rule.metric.value(summary);
            rule.bands.iter().find(|band| value >= band.min).map(|band| Insight {
                category: band.category,
                message: band.template.replace("{value}", &rule.metric.display(summary)),
            })
        })
        .collect();

    for rule in PARAMETER_RULES {
        let value = match rule.parameter {
            Parameter::ProtocolComplexity => i,
            Parameter::Tolerance => epsilon,
        };
        if value > rule.above {
            insights.push(Insight {
                category: InsightCategory::Info,
                message: rule.template.replace("{value}", &value.to_string()),
            });
        }
    }

    insights
}

pub fn generate_insights(result: &EnsembleResult, scenario: &Scenario) -> Vec<Insight> {
    insights_for(&result.summary, scenario.protocol_complexity, scenario.tolerance)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(success: f64, atcf: f64, robustness: f64) -> EnsembleSummary {
        EnsembleSummary {
            avg_success_rate_pct: success,
            avg_final_atcf: atcf,
            min_final_atcf: atcf,
            robustness_pct: robustness,
        }
    }

    fn categories(insights: &[Insight]) -> Vec<InsightCategory> {
        insights.iter().map(|i| i.category).collect()
    }

    #[test]
    fn test_all_green() {
        let insights = insights_for(&summary(85.0, 0.75, 90.0), 0.2, 0.3);
        assert_eq!(insights.len(), 3);
        assert!(insights.iter().all(|i| i.category == InsightCategory::Success));
        assert!(insights[0].message.contains("85%"));
        assert!(insights[1].message.contains("ATCF: 75%"));
        assert!(insights[2].message.contains("90% robustness"));
    }

    #[test]
    fn test_band_floors_are_inclusive() {
        let insights = insights_for(&summary(70.0, 0.7, 80.0), 0.0, 0.0);
        assert_eq!(categories(&insights), vec![InsightCategory::Success; 3]);

        let insights = insights_for(&summary(40.0, 0.5, 50.0), 0.0, 0.0);
        assert_eq!(categories(&insights), vec![InsightCategory::Warning; 3]);
    }

    #[test]
    fn test_low_robustness_is_silent() {
        let insights = insights_for(&summary(20.0, 0.3, 49.9), 0.0, 0.0);
        assert_eq!(
            categories(&insights),
            vec![InsightCategory::Error, InsightCategory::Error]
        );
        assert!(insights[0].message.starts_with("Low success rate (20%)"));
        assert!(insights[1].message.contains("ATCF: 30%"));
    }

    #[test]
    fn test_parameter_notes_are_strictly_above() {
        let base = summary(85.0, 0.75, 90.0);
        assert_eq!(insights_for(&base, 0.3, 0.35).len(), 3);

        let insights = insights_for(&base, 0.4, 0.45);
        assert_eq!(insights.len(), 5);
        assert_eq!(insights[3].category, InsightCategory::Info);
        assert_eq!(
            insights[3].message,
            "High protocol complexity (I=0.4). This creates friction but may ensure quality."
        );
        assert_eq!(
            insights[4].message,
            "High tolerance for difference (ε=0.45). This enables diverse coordination."
        );
    }

    #[test]
    fn test_displayed_values_are_rounded() {
        let insights = insights_for(&summary(42.5, 0.614, 66.66), 0.0, 0.0);
        assert_eq!(
            insights[0].message,
            "Moderate success (43%). Consider adjusting I or ε to improve coordination."
        );
        assert!(insights[1].message.contains("ATCF: 61%"));
        assert!(insights[2].message.contains("(67%)"));
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&InsightCategory::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
    }
}
