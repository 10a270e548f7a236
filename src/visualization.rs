// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Coalition Ethics Lab - Chart Data
//
// Reprojects an ensemble into the shape consumed by the chart renderers.
// Field names are part of the front-end contract.

use serde::Serialize;

use crate::metrics::group_breakdown;
use crate::types::EnsembleResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time: u32,
    pub success_rate_pct: f64,
    pub atcf_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAtcfPoint {
    pub group: String,
    pub atcf_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStat {
    pub metric: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualizationData {
    pub time_series: Vec<TimeSeriesPoint>,
    pub group_atcf: Vec<GroupAtcfPoint>,
    pub summary_stats: Vec<SummaryStat>,
}

/// Chart data for `result`. Group bars come from the final step of the first run.
pub fn visualization_data(result: &EnsembleResult) -> VisualizationData {
    let time_series = result
        .time_series
        .iter()
        .map(|t| TimeSeriesPoint {
            time: t.time,
            success_rate_pct: t.avg_success_pct,
            atcf_pct: t.avg_atcf * 100.0,
        })
        .collect();

    let group_atcf = group_breakdown(result, 0)
        .map(|metrics| {
            metrics
                .atcf_by_group
                .into_iter()
                .map(|g| GroupAtcfPoint {
                    group: g.group,
                    atcf_pct: g.atcf * 100.0,
                })
                .collect()
        })
        .unwrap_or_default();

    let summary = &result.summary;
    let summary_stats = vec![
        SummaryStat {
            metric: "Success Rate".to_string(),
            value: summary.avg_success_rate_pct,
        },
        SummaryStat {
            metric: "Final ATCF".to_string(),
            value: summary.avg_final_atcf * 100.0,
        },
        SummaryStat {
            metric: "Robustness".to_string(),
            value: summary.robustness_pct,
        },
    ];

    VisualizationData {
        time_series,
        group_atcf,
        summary_stats,
    }
}
