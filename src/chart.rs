use crate::models::PaymentStatistics;
use serde::Serialize;
use std::f64::consts::PI;

pub const CIRCLE_RADIUS: f64 = 60.0;
pub const STROKE_WIDTH: f64 = 12.0;
/// 12 o'clock in SVG rotation terms.
pub const START_ROTATION_DEGREES: f64 = -90.0;

pub fn circumference() -> f64 {
    2.0 * PI * CIRCLE_RADIUS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentCategory {
    #[serde(rename = "FULL")]
    PaidFull,
    #[serde(rename = "PARTIAL")]
    PaidPartial,
    #[serde(rename = "NONE")]
    NotPaid,
}

impl PaymentCategory {
    /// Drawing order, fixed.
    pub const ORDER: [PaymentCategory; 3] = [
        PaymentCategory::PaidFull,
        PaymentCategory::PaidPartial,
        PaymentCategory::NotPaid,
    ];

    pub fn count(self, stats: &PaymentStatistics) -> u64 {
        match self {
            PaymentCategory::PaidFull => stats.paid_full,
            PaymentCategory::PaidPartial => stats.paid_partial,
            PaymentCategory::NotPaid => stats.not_paid,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            PaymentCategory::PaidFull => "#28a745",
            PaymentCategory::PaidPartial => "#ffc107",
            PaymentCategory::NotPaid => "#dc3545",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartSegment {
    pub category: PaymentCategory,
    pub percentage: f64,
    pub start_angle_degrees: f64,
    pub arc_length_units: f64,
}

impl ChartSegment {
    /// `stroke-dasharray` pair: the visible arc, then the gap closing the circle.
    pub fn dash_array(&self) -> (f64, f64) {
        (self.arc_length_units, circumference() - self.arc_length_units)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub category: PaymentCategory,
    pub percentage: f64,
    pub display: String,
    pub color: &'static str,
}

/// Share of each category in drawing order. All zero without usable stats.
pub fn percentages(stats: Option<&PaymentStatistics>) -> [(PaymentCategory, f64); 3] {
    PaymentCategory::ORDER.map(|category| {
        let percentage = match stats {
            Some(stats) if stats.total_people > 0 => {
                category.count(stats) as f64 / stats.total_people as f64 * 100.0
            }
            _ => 0.0,
        };
        (category, percentage)
    })
}

pub fn derive_segments(stats: Option<&PaymentStatistics>) -> Vec<ChartSegment> {
    let circumference = circumference();
    let mut rotation = START_ROTATION_DEGREES;
    let mut segments = Vec::with_capacity(3);

    for (category, percentage) in percentages(stats) {
        if percentage <= 0.0 {
            continue;
        }
        let share = percentage / 100.0;
        segments.push(ChartSegment {
            category,
            percentage,
            start_angle_degrees: rotation,
            arc_length_units: share * circumference,
        });
        rotation += share * 360.0;
    }

    segments
}

pub fn legend(stats: Option<&PaymentStatistics>) -> Vec<LegendEntry> {
    percentages(stats)
        .into_iter()
        .map(|(category, percentage)| LegendEntry {
            category,
            percentage,
            display: format!("{percentage:.1}%"),
            color: category.color(),
        })
        .collect()
}
