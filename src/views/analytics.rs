//! Analytics page

use crate::client::AnalyticsDay;

/// conversions / clicks × 100, rounded to two decimals; 0 when there are no clicks
pub fn conversion_rate(conversions: u64, clicks: u64) -> f64 {
    if clicks == 0 {
        return 0.0;
    }
    let rate = conversions as f64 / clicks as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Sums across all rows
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalyticsTotals {
    pub views: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
}

impl AnalyticsTotals {
    pub fn from_days(days: &[AnalyticsDay]) -> Self {
        let views = days.iter().map(|d| d.views).sum();
        let clicks = days.iter().map(|d| d.clicks).sum();
        let conversions = days.iter().map(|d| d.conversions).sum();
        Self {
            views,
            clicks,
            conversions,
            conversion_rate: conversion_rate(conversions, clicks),
        }
    }
}

/// One table row with its own rate
#[derive(Debug, Clone, PartialEq)]
pub struct DayRow {
    pub date: String,
    pub views: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub conversion_rate: f64,
}

impl From<&AnalyticsDay> for DayRow {
    fn from(day: &AnalyticsDay) -> Self {
        Self {
            date: day.date.clone(),
            views: day.views,
            clicks: day.clicks,
            conversions: day.conversions,
            conversion_rate: conversion_rate(day.conversions, day.clicks),
        }
    }
}

/// Rows shown on the analytics page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsPage {
    pub days: Vec<AnalyticsDay>,
}

impl AnalyticsPage {
    pub fn new(days: Vec<AnalyticsDay>) -> Self {
        Self { days }
    }

    pub fn totals(&self) -> AnalyticsTotals {
        AnalyticsTotals::from_days(&self.days)
    }

    pub fn rows(&self) -> Vec<DayRow> {
        self.days.iter().map(DayRow::from).collect()
    }
}
